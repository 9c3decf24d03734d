pub mod error;
pub mod infohash;
pub mod metadata;

pub use error::TorrentError;
pub use infohash::calculate_info_hash;
pub use metadata::{FileEntry, Torrent, TORRENT_PREFIX};
