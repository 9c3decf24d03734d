use log::{debug, info, warn};

use crate::feed::{EventManager, Feed, Registration};
use crate::torrent::{Torrent, TorrentError};

/// Gives every feed entry that carries a torrent a `.torrent` filename.
#[derive(Debug, Clone, Copy)]
pub struct TorrentFilename {
    order: i32,
}

impl Default for TorrentFilename {
    fn default() -> Self {
        Self::new(-200)
    }
}

impl TorrentFilename {
    pub fn new(order: i32) -> Self {
        TorrentFilename { order }
    }

    /// Hooks `run` into the `modify` event.
    pub fn register(&self, manager: &mut dyn EventManager) {
        let plugin = *self;
        manager.register(Registration {
            event: "modify".to_string(),
            keyword: "torrent".to_string(),
            order: self.order,
            builtin: true,
            callback: Box::new(move |feed: &mut Feed| plugin.run(feed)),
        });
    }

    /// Attaches the parsed torrent and a derived filename to each entry whose
    /// data is a torrent. Other entries are left untouched.
    pub fn run(&self, feed: &mut Feed) {
        for entry in &mut feed.entries {
            let torrent = match Torrent::new(&entry.data) {
                Ok(torrent) => torrent,
                Err(TorrentError::InvalidContent) => {
                    debug!("{} is not a torrent, skipping", entry.title);
                    continue;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", entry.title, e);
                    continue;
                }
            };

            match make_filename(&torrent, &entry.title) {
                Ok(filename) => {
                    info!("{} -> {}", entry.title, filename);
                    entry.filename = Some(filename);
                }
                Err(e) => warn!("No filename for {}: {}", entry.title, e),
            }
            entry.torrent = Some(torrent);
        }
    }
}

/// Builds a filename for `torrent` from the feed title.
///
/// For a single-file torrent whose file name is longer than the title, the
/// file name minus its extension is used instead.
pub fn make_filename(torrent: &Torrent, title: &str) -> Result<String, TorrentError> {
    let files = torrent.file_list()?;

    let title = match files.as_slice() {
        [file] if file.name.chars().count() > title.chars().count() => {
            match file.name.rfind('.') {
                Some(dot) => file.name[..dot].to_string(),
                None => file.name.clone(),
            }
        }
        _ => title.replace('/', "_"),
    };

    // ISO-8859-1 only; anything else (zero-width spaces and the like) is dropped
    let title: String = title
        .replace(' ', "_")
        .chars()
        .filter(|&c| u32::from(c) <= 0xff)
        .collect();

    Ok(format!("{}.torrent", title))
}

#[cfg(test)]
mod tests {
    use crate::feed::{Entry, PluginManager};

    use super::*;

    const SINGLE_FILE: &[u8] = b"d8:announce3:url4:infod6:lengthi1024e4:name18:Some.Long.Name.isoee";
    const MULTI_FILE: &[u8] = b"d8:announce3:url4:infod5:filesld6:lengthi10e4:pathl5:a.txteed6:lengthi20e4:pathl5:b.txteee4:name4:rootee";

    #[test]
    fn test_single_file_longer_name_wins() {
        let torrent = Torrent::new(SINGLE_FILE).unwrap();
        assert_eq!(make_filename(&torrent, "short").unwrap(), "Some.Long.Name.torrent");
    }

    #[test]
    fn test_single_file_keeps_longer_title() {
        let torrent = Torrent::new(SINGLE_FILE).unwrap();
        assert_eq!(
            make_filename(&torrent, "A much longer feed title").unwrap(),
            "A_much_longer_feed_title.torrent"
        );
    }

    #[test]
    fn test_single_file_title_slashes_replaced() {
        let torrent = Torrent::new(SINGLE_FILE).unwrap();
        let filename = make_filename(&torrent, "Show / Season / Complete Pack").unwrap();
        assert_eq!(filename, "Show___Season___Complete_Pack.torrent");
        assert!(!filename.contains('/'));
    }

    #[test]
    fn test_single_file_without_extension() {
        let torrent = Torrent::new(b"d8:announce0:4:infod6:lengthi1e4:name6:READMEee").unwrap();
        assert_eq!(make_filename(&torrent, "x").unwrap(), "README.torrent");
    }

    #[test]
    fn test_multi_file_sanitizes_title() {
        let torrent = Torrent::new(MULTI_FILE).unwrap();
        assert_eq!(
            make_filename(&torrent, "Show / Season 1").unwrap(),
            "Show___Season_1.torrent"
        );
    }

    #[test]
    fn test_drops_non_latin1() {
        let torrent = Torrent::new(MULTI_FILE).unwrap();
        assert_eq!(
            make_filename(&torrent, "Caf\u{e9}\u{200b} Night").unwrap(),
            "Caf\u{e9}_Night.torrent"
        );
    }

    #[test]
    fn test_run_only_touches_torrents() {
        let mut feed = Feed::new("test");
        feed.entries.push(Entry::new("short", "http://127.0.0.1/a", SINGLE_FILE.to_vec()));
        feed.entries.push(Entry::new("html", "http://127.0.0.1/b", b"<html></html>".to_vec()));
        feed.entries.push(Entry::new("broken", "http://127.0.0.1/c", b"d8:announce".to_vec()));

        TorrentFilename::default().run(&mut feed);

        assert_eq!(feed.entries[0].filename.as_deref(), Some("Some.Long.Name.torrent"));
        assert!(feed.entries[0].torrent.is_some());
        for entry in &feed.entries[1..] {
            assert!(entry.filename.is_none());
            assert!(entry.torrent.is_none());
        }
    }

    #[test]
    fn test_register_and_fire() {
        let mut manager = PluginManager::new();
        TorrentFilename::default().register(&mut manager);
        assert_eq!(manager.keywords("modify"), vec!["torrent"]);

        let mut feed = Feed::new("test");
        feed.entries.push(Entry::new("Multi / Pack", "", MULTI_FILE.to_vec()));
        manager.fire("modify", &mut feed);

        assert_eq!(feed.entries[0].filename.as_deref(), Some("Multi___Pack.torrent"));
    }
}
