pub mod entry;
pub mod filename;
pub mod manager;

pub use entry::{Entry, Feed};
pub use filename::{make_filename, TorrentFilename};
pub use manager::{Callback, EventManager, PluginManager, Registration};
