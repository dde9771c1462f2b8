//! Where the bookmark list and visited log live on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ember_browser::{Browser, UrlList};

pub const BOOKMARKS_FILE: &str = "bookmarks.json";
pub const HISTORY_FILE: &str = "history.json";

/// JSON files for the two persisted lists.
#[derive(Debug, Clone)]
pub struct Storage {
    bookmarks: PathBuf,
    history: PathBuf,
}

impl Storage {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            bookmarks: dir.join(BOOKMARKS_FILE),
            history: dir.join(HISTORY_FILE),
        }
    }

    /// `EMBER_DATA_DIR`, else the working directory.
    pub fn from_env() -> Self {
        let dir = std::env::var_os("EMBER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::in_dir(&dir)
    }

    /// Load both lists. Missing files are empty lists.
    pub fn load(&self) -> Result<(UrlList, UrlList)> {
        let bookmarks = UrlList::load(&self.bookmarks)
            .with_context(|| format!("reading {}", self.bookmarks.display()))?;
        let history = UrlList::load(&self.history)
            .with_context(|| format!("reading {}", self.history.display()))?;
        log::info!(
            "loaded {} bookmarks and {} history entries",
            bookmarks.len(),
            history.len()
        );
        Ok((bookmarks, history))
    }

    pub fn save(&self, browser: &Browser) -> Result<()> {
        browser
            .bookmarks()
            .save(&self.bookmarks)
            .with_context(|| format!("writing {}", self.bookmarks.display()))?;
        browser
            .visited()
            .save(&self.history)
            .with_context(|| format!("writing {}", self.history.display()))?;
        Ok(())
    }
}
