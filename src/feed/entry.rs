use crate::torrent::Torrent;

/// One item of a feed. `torrent` and `filename` are filled in by the
/// filename hook when `data` holds a torrent.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub title: String,
    pub url: String,
    pub data: Vec<u8>,
    pub torrent: Option<Torrent>,
    pub filename: Option<String>,
}

impl Entry {
    pub fn new(title: impl Into<String>, url: impl Into<String>, data: Vec<u8>) -> Self {
        Entry {
            title: title.into(),
            url: url.into(),
            data,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Feed {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Feed {
    pub fn new(name: impl Into<String>) -> Self {
        Feed { name: name.into(), entries: Vec::new() }
    }
}
