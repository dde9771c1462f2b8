//! Browser configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! viewport_width = 1200
//!
//! [layout]
//! base_font_size = 18
//! link_color = "#0000ee"
//!
//! [net]
//! read_timeout_secs = 20
//! ```

use std::path::Path;

use ember_net::NetConfig;
use ember_types::{EmberError, Result};
use serde::Deserialize;

use crate::layout::LayoutConfig;
use crate::scroll::SCROLL_LINE;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub layout: LayoutConfig,
    pub net: NetConfig,
    /// Initial viewport size in pixels.
    pub viewport_width: i32,
    pub viewport_height: i32,
    /// Pixels per line scroll step.
    pub scroll_line: i32,
    /// Prefix for URL-bar searches; the query is appended.
    pub search_url: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            net: NetConfig::default(),
            viewport_width: 1000,
            viewport_height: 700,
            scroll_line: SCROLL_LINE,
            search_url: "https://www.google.com/search?q=".to_string(),
        }
    }
}

impl BrowserConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded browser config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.viewport_width <= 0 || self.viewport_height <= 0 {
            return Err(EmberError::Config(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        let sizes = [
            self.layout.base_font_size,
            self.layout.h1_font_size,
            self.layout.h2_font_size,
        ];
        if sizes.contains(&0) {
            return Err(EmberError::Config("font sizes must be non-zero".into()));
        }
        let multiplier = self.layout.line_height_multiplier;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(EmberError::Config(format!(
                "line_height_multiplier must be positive, got {multiplier}"
            )));
        }
        if self.scroll_line <= 0 {
            return Err(EmberError::Config("scroll_line must be positive".into()));
        }
        Ok(())
    }
}
