use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

use modtorrent::config::{Config, DEFAULT_CONFIG_PATH};
use modtorrent::engine::{use_command, Cli};

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", config_path.display(), e);
            process::exit(2);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    if let Err(e) = use_command(cli.command, &config) {
        error!("{:#}", e);
        process::exit(1);
    }
}
