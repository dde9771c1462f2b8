//! Deduplicated URL lists (bookmarks, visited log) and their JSON
//! persistence.

use std::io::ErrorKind;
use std::path::Path;

use ember_types::Result;
use serde::{Deserialize, Serialize};

/// Insertion-ordered list of unique URLs. Stored as a JSON array of
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlList {
    urls: Vec<String>,
}

impl UrlList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `url` unless it is already present. Returns whether it
    /// was added.
    pub fn add(&mut self, url: &str) -> bool {
        if url.is_empty() || self.contains(url) {
            return false;
        }
        self.urls.push(url.to_string());
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Load from `path`. A missing file is an empty list.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("{} does not exist, starting empty", path.display());
                return Ok(Self::new());
            },
            Err(e) => return Err(e.into()),
        };
        let raw: Vec<String> = serde_json::from_str(&text)?;
        // Files edited by hand may repeat entries.
        let mut list = Self::new();
        for url in &raw {
            list.add(url);
        }
        Ok(list)
    }

    /// Write as pretty-printed JSON, replacing the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl FromIterator<String> for UrlList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut list = Self::new();
        for url in iter {
            list.add(&url);
        }
        list
    }
}
