use thiserror::Error;

use crate::bencode::BencodeError;

/// Errors raised while loading or querying a torrent.
#[derive(Debug, Error)]
pub enum TorrentError {
    /// The buffer does not start like a torrent file.
    #[error("Invalid content for a torrent")]
    InvalidContent,

    #[error("Bencode error: {0}")]
    Bencode(#[from] BencodeError),

    #[error("Missing '{0}'")]
    MissingField(&'static str),

    #[error("'{0}' has an invalid value")]
    InvalidField(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
