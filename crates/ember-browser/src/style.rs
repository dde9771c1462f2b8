//! Text style snapshots carried by layout fragments.

use ember_types::Color;
use serde::{Deserialize, Serialize};

/// Font weight. Only the two weights the layout tags can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn is_bold(self) -> bool {
        self == FontWeight::Bold
    }
}

/// The style in effect when a word was placed.
///
/// The layout engine keeps one current `Style` and clones it into each
/// fragment, so a fragment's style never changes after emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub font_family: String,
    pub font_size: u16,
    pub font_weight: FontWeight,
    pub color: Color,
    pub underline: bool,
    /// Target of the enclosing `<a href>`, if any.
    pub link: Option<String>,
}

impl Style {
    /// Plain body text: normal weight, no underline, no link.
    pub fn base(font_family: &str, font_size: u16, color: Color) -> Self {
        Self {
            font_family: font_family.to_string(),
            font_size,
            font_weight: FontWeight::Normal,
            color,
            underline: false,
            link: None,
        }
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }
}
