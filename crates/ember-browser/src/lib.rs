//! Browser core for Ember: markup tokenizer, flow layout, scroll and
//! history models, tabs, and the [`Browser`] session that ties them to
//! an [`ember_net::Fetch`] implementation.
//!
//! The crate never draws. A front end feeds it URLs, pointer positions
//! and viewport sizes, and paints the [`LayoutResult`] of the current
//! tab itself.

pub mod browser;
pub mod config;
pub mod history;
pub mod home;
pub mod layout;
pub mod omnibox;
pub mod scroll;
pub mod style;
pub mod tabs;
pub mod tokenizer;
pub mod url_list;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use browser::Browser;
pub use config::BrowserConfig;
pub use history::NavigationHistory;
pub use home::HOME_URL;
pub use layout::{
    Fragment, LayoutConfig, LayoutResult, LinkRegion, SimpleTextMeasurer, TextMeasurer, layout,
    layout_with,
};
pub use omnibox::normalize_input;
pub use scroll::ScrollState;
pub use style::{FontWeight, Style};
pub use tabs::{CloseOutcome, Tab, TabId, TabManager};
pub use tokenizer::{Token, tokenize};
pub use url_list::UrlList;
