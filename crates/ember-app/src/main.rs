//! Ember command-line driver.
//!
//! Reads one command per line from stdin (`help` lists them), drives a
//! [`Browser`], and prints what changed. Bookmarks and the visited log
//! are kept as JSON in `EMBER_DATA_DIR` (default: the working
//! directory). The config file path comes from the first argument or
//! `EMBER_CONFIG`.

mod commands;
mod storage;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use ember_browser::{Browser, BrowserConfig};
use ember_net::HttpFetcher;

use commands::{Command, Flow};
use storage::Storage;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    log::info!(
        "Starting Ember ({}x{} viewport)",
        config.viewport_width,
        config.viewport_height
    );

    let mut fetcher = HttpFetcher::new(config.net.clone());
    #[cfg(feature = "tls")]
    fetcher.set_tls_provider(Box::new(ember_net::RustlsTlsProvider::new()));
    if !fetcher.has_tls() {
        log::warn!("built without TLS; https pages will fail to load");
    }

    let storage = Storage::from_env();
    let (bookmarks, history) = storage.load()?;
    let mut browser = Browser::new(config, Box::new(fetcher)).with_lists(bookmarks, history);

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "Ember ready. Type `help` for commands.")?;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let flow = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(cmd)) => commands::execute(cmd, &mut browser, &mut out)?,
            Err(e) => {
                writeln!(out, "error: {e:#}")?;
                continue;
            },
        };
        out.flush()?;
        if let Err(e) = storage.save(&browser) {
            log::warn!("could not save lists: {e:#}");
        }
        if flow == Flow::Quit {
            break;
        }
    }

    storage.save(&browser)?;
    log::info!("Ember shut down");
    Ok(())
}

/// Config from the first CLI argument or `EMBER_CONFIG`, else defaults.
fn load_config() -> Result<BrowserConfig> {
    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("EMBER_CONFIG"))
        .map(PathBuf::from);

    match path {
        Some(path) => BrowserConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(BrowserConfig::default()),
    }
}
