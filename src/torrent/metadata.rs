use std::{
    collections::HashMap,
    fmt,
    fs,
    path::Path,
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::bencode::{decode_bencode, encode_bvalue, BValue};
use crate::torrent::{calculate_info_hash, TorrentError};

/// Every torrent this crate accepts starts with its `announce` key.
pub const TORRENT_PREFIX: &[u8] = b"d8:announce";

const ANNOUNCE_LIST: &[u8] = b"announce-list";

/// One file described by a torrent's `info` dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,           // Last path component
    pub size: u64,              // Length in bytes
    pub path: String,           // Parent directories joined with '/', empty for single-file torrents
}

/// A decoded .torrent file.
///
/// The whole document is kept as a `BValue` tree so that keys this type does
/// not know about survive a decode/modify/encode cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Torrent {
    content: BValue,
}

impl Torrent {
    /// Parses a torrent from raw bytes.
    ///
    /// Buffers that do not start with `d8:announce` are rejected with
    /// `TorrentError::InvalidContent` before any decoding happens.
    pub fn new(content: &[u8]) -> Result<Self, TorrentError> {
        if !content.starts_with(TORRENT_PREFIX) {
            return Err(TorrentError::InvalidContent);
        }

        let content = decode_bencode(content)?;
        debug!("Decoded torrent document");
        Ok(Torrent { content })
    }

    /// Reads a .torrent file from disk and parses it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TorrentError> {
        let buf = fs::read(path.as_ref())?;
        debug!("Read {} bytes from {}", buf.len(), path.as_ref().display());
        Self::new(&buf)
    }

    pub fn content(&self) -> &BValue {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut BValue {
        &mut self.content
    }

    pub fn into_value(self) -> BValue {
        self.content
    }

    /// The single tracker URL from `announce`.
    pub fn announce(&self) -> Option<&[u8]> {
        self.content.get(b"announce")?.as_bytes()
    }

    /// Re-encodes the (possibly modified) torrent.
    pub fn encode(&self) -> Vec<u8> {
        encode_bvalue(&self.content)
    }

    pub fn info_hash(&self) -> Result<[u8; 20], TorrentError> {
        let info = self
            .content
            .get(b"info")
            .ok_or(TorrentError::MissingField("info"))?;
        Ok(calculate_info_hash(info))
    }

    fn info(&self) -> Result<&HashMap<Vec<u8>, BValue>, TorrentError> {
        self.content
            .get(b"info")
            .ok_or(TorrentError::MissingField("info"))?
            .as_dict()
            .ok_or(TorrentError::InvalidField("info"))
    }

    /// Lists the files of this torrent in the order they are stored.
    ///
    /// A `length` key in `info` marks a single-file torrent; otherwise every
    /// entry of `info.files` becomes one `FileEntry`.
    pub fn file_list(&self) -> Result<Vec<FileEntry>, TorrentError> {
        let info = self.info()?;

        if info.contains_key(b"length".as_slice()) {
            return Ok(vec![FileEntry {
                name: lossy(lookup_bytestring(info, "name")?),
                size: get_integer(info, "length")?,
                path: String::new(),
            }]);
        }

        let files = info
            .get(b"files".as_slice())
            .ok_or(TorrentError::MissingField("files"))?
            .as_list()
            .ok_or(TorrentError::InvalidField("files"))?;

        files
            .iter()
            .map(|item| -> Result<FileEntry, TorrentError> {
                let file = item.as_dict().ok_or(TorrentError::InvalidField("files"))?;
                let components = file
                    .get(b"path".as_slice())
                    .ok_or(TorrentError::MissingField("path"))?
                    .as_list()
                    .ok_or(TorrentError::InvalidField("path"))?
                    .iter()
                    .map(|c| c.as_bytes().map(lossy).ok_or(TorrentError::InvalidField("path")))
                    .collect::<Result<Vec<String>, TorrentError>>()?;

                let (name, parents) = components
                    .split_last()
                    .ok_or(TorrentError::InvalidField("path"))?;

                Ok(FileEntry {
                    name: name.clone(),
                    size: get_integer(file, "length")?,
                    path: parents.join("/"),
                })
            })
            .collect()
    }

    /// Sum of all file sizes.
    pub fn total_size(&self) -> Result<u64, TorrentError> {
        Ok(self.file_list()?.iter().map(|f| f.size).sum())
    }

    /// All trackers of `announce-list`, outer tier order then inner order.
    /// Empty when the torrent only has the single `announce` URL.
    pub fn multi_trackers(&self) -> Vec<&[u8]> {
        self.content
            .get(ANNOUNCE_LIST)
            .and_then(BValue::as_list)
            .into_iter()
            .flatten()
            .filter_map(BValue::as_list)
            .flatten()
            .filter_map(BValue::as_bytes)
            .collect()
    }

    /// Removes the first occurrence of `tracker` from every tier, dropping
    /// tiers that end up empty. Unknown trackers are ignored.
    pub fn remove_tracker(&mut self, tracker: &[u8]) {
        let Some(tiers) = self.announce_list_mut() else {
            return;
        };

        let mut removed = 0;
        tiers.retain_mut(|tier| {
            let Some(list) = tier.as_list_mut() else {
                return true;
            };
            match list.iter().position(|t| t.as_bytes() == Some(tracker)) {
                Some(index) => {
                    list.remove(index);
                    removed += 1;
                    !list.is_empty()
                }
                None => true,
            }
        });

        debug!(
            "Removed tracker {} from {} tier(s)",
            String::from_utf8_lossy(tracker),
            removed
        );
    }

    /// Appends `tracker` as a new tier of its own, creating `announce-list`
    /// when the torrent has none.
    pub fn add_tracker(&mut self, tracker: &[u8]) {
        let Some(root) = self.content.as_dict_mut() else {
            return;
        };

        let tier = BValue::List(vec![BValue::ByteString(tracker.to_vec())]);
        match root
            .entry(ANNOUNCE_LIST.to_vec())
            .or_insert_with(|| BValue::List(Vec::new()))
        {
            BValue::List(tiers) => tiers.push(tier),
            other => {
                warn!("Replacing malformed announce-list");
                *other = BValue::List(vec![tier]);
            }
        }

        debug!("Added tracker {}", String::from_utf8_lossy(tracker));
    }

    fn announce_list_mut(&mut self) -> Option<&mut Vec<BValue>> {
        self.content
            .as_dict_mut()?
            .get_mut(ANNOUNCE_LIST)?
            .as_list_mut()
    }
}

impl fmt::Display for Torrent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.file_list() {
            Ok(files) => {
                let names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
                write!(f, "Torrent instance. Files: {:?}", names)
            }
            Err(e) => write!(f, "Torrent instance. Files: <{}>", e),
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Looks up a key in the dictionary and returns a byte slice if the value is a ByteString.
fn lookup_bytestring<'a>(
    dict: &'a HashMap<Vec<u8>, BValue>,
    key: &'static str,
) -> Result<&'a [u8], TorrentError> {
    dict.get(key.as_bytes())
        .ok_or(TorrentError::MissingField(key))?
        .as_bytes()
        .ok_or(TorrentError::InvalidField(key))
}

/// Retrieves a non-negative integer value from the dictionary.
fn get_integer(
    dict: &HashMap<Vec<u8>, BValue>,
    key: &'static str,
) -> Result<u64, TorrentError> {
    let val = dict
        .get(key.as_bytes())
        .ok_or(TorrentError::MissingField(key))?
        .as_integer()
        .ok_or(TorrentError::InvalidField(key))?;

    u64::try_from(val).map_err(|_| TorrentError::InvalidField(key))
}
