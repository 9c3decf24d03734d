// lib.rs - bencode codec and .torrent editing

pub mod bencode;
pub mod config;
pub mod engine;
pub mod feed;
pub mod torrent;

// Re-export commonly used types for easier testing
pub use bencode::{bvalue_to_json, decode_bencode, encode_bvalue, BValue, BencodeError};
pub use config::Config;
pub use feed::{make_filename, Entry, EventManager, Feed, PluginManager, TorrentFilename};
pub use torrent::{FileEntry, Torrent, TorrentError};
