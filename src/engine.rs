// src/engine.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use log::info;

use crate::bencode::{bvalue_to_json, decode_bencode};
use crate::config::Config;
use crate::feed::{make_filename, Entry, Feed, PluginManager, TorrentFilename};
use crate::torrent::Torrent;

/// Inspect and modify .torrent files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file, defaults to modtorrent.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a bencoded value as JSON
    Decode {
        value: String,
    },
    /// Show files and trackers of a torrent
    Info {
        torrent: PathBuf,
        /// Print the file list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the filename derived from a torrent and a title
    Filename {
        torrent: PathBuf,
        title: String,
    },
    /// Append a tracker tier to announce-list
    AddTracker {
        torrent: PathBuf,
        url: String,
        /// Defaults to the torrent's file name inside output_directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove a tracker from every announce-list tier
    RemoveTracker {
        torrent: PathBuf,
        url: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the filename hook over a set of files as one feed
    Feed {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

pub fn use_command(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Decode { value } => {
            let decoded = decode_bencode(value.as_bytes()).context("Failed to decode value")?;
            println!("{}", serde_json::to_string(&bvalue_to_json(&decoded))?);
        }
        Command::Info { torrent: path, json } => {
            let torrent = load(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&torrent.file_list()?)?);
                return Ok(());
            }

            println!("Info Hash: {}", hex::encode(torrent.info_hash()?));
            if let Some(announce) = torrent.announce() {
                println!("Tracker URL: {}", String::from_utf8_lossy(announce));
            }

            let files = torrent.file_list()?;
            println!("Files: {}", files.len());
            for file in &files {
                if file.path.is_empty() {
                    println!("  {} ({} bytes)", file.name, file.size);
                } else {
                    println!("  {}/{} ({} bytes)", file.path, file.name, file.size);
                }
            }

            for tracker in torrent.multi_trackers() {
                println!("Multi-tracker: {}", String::from_utf8_lossy(tracker));
            }
        }
        Command::Filename { torrent: path, title } => {
            let torrent = load(&path)?;
            println!("{}", make_filename(&torrent, &title)?);
        }
        Command::AddTracker { torrent: path, url, output } => {
            let mut torrent = load(&path)?;
            torrent.add_tracker(url.as_bytes());
            let written = save(&torrent, &path, output, config)?;
            info!("Added {} to {}", url, written.display());
        }
        Command::RemoveTracker { torrent: path, url, output } => {
            let mut torrent = load(&path)?;
            torrent.remove_tracker(url.as_bytes());
            let written = save(&torrent, &path, output, config)?;
            info!("Removed {} from {}", url, written.display());
        }
        Command::Feed { files } => {
            let mut feed = Feed::new("command line");
            for path in &files {
                let data = fs::read(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let title = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                feed.entries.push(Entry::new(title, path.display().to_string(), data));
            }

            let mut manager = PluginManager::new();
            TorrentFilename::new(config.filename_order).register(&mut manager);
            manager.fire("modify", &mut feed);

            for entry in &feed.entries {
                println!("{}\t{}", entry.url, entry.filename.as_deref().unwrap_or("-"));
            }
        }
    }
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Torrent> {
    Torrent::from_file(path).with_context(|| format!("Error reading torrent {}", path.display()))
}

/// Writes `torrent` to `output`, or next to the configured output directory
/// under the source file's name.
fn save(
    torrent: &Torrent,
    source: &Path,
    output: Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<PathBuf> {
    let target = match output {
        Some(output) => output,
        None => {
            let name = source
                .file_name()
                .ok_or_else(|| anyhow!("{} has no file name", source.display()))?;
            Path::new(&config.output_directory).join(name)
        }
    };

    fs::write(&target, torrent.encode())
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(target)
}
