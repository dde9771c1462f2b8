//! Tab state and the tab strip model.
//!
//! The manager only owns the records; it never fetches or lays out.
//! The [`Browser`](crate::Browser) session loads pages into whichever
//! tab the manager reports as current.

use crate::history::NavigationHistory;
use crate::layout::LayoutResult;
use crate::scroll::ScrollState;
use crate::tokenizer::Token;

/// Stable handle for a tab. Indices shift when tabs close; ids do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Title shown until a page provides one.
pub const NEW_TAB_TITLE: &str = "New Tab";

/// One tab's complete state.
#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    /// URL of the page being shown.
    pub url: String,
    pub title: String,
    pub scroll: ScrollState,
    pub layout: LayoutResult,
    pub history: NavigationHistory,
    /// Tokens of the current page, kept so a resize can re-lay out
    /// without refetching.
    pub tokens: Vec<Token>,
    /// Message of the last failed load, if the page is an error page.
    pub error: Option<String>,
    /// Loads in this tab are kept out of the visited log.
    pub private: bool,
}

impl Tab {
    /// A blank tab pointed at `url`. Nothing is loaded yet.
    pub fn new(id: TabId, url: &str, scroll: ScrollState) -> Self {
        Self {
            id,
            url: url.to_string(),
            title: NEW_TAB_TITLE.to_string(),
            scroll,
            layout: LayoutResult::default(),
            history: NavigationHistory::new(),
            tokens: Vec::new(),
            error: None,
            private: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// What [`TabManager::close_tab`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The tab was removed.
    Removed,
    /// It was the last tab; a fresh home tab took its place.
    Replaced,
    /// Index out of range; nothing changed.
    Ignored,
}

/// Owns every tab and tracks the current one. Never empty.
#[derive(Debug, Clone)]
pub struct TabManager {
    tabs: Vec<Tab>,
    current: usize,
    next_id: u64,
    home_url: String,
    scroll_template: ScrollState,
}

impl TabManager {
    /// One blank tab at `home_url`. New tabs copy `scroll_template`'s
    /// viewport height and step.
    pub fn new(home_url: &str, scroll_template: ScrollState) -> Self {
        let mut mgr = Self {
            tabs: Vec::new(),
            current: 0,
            next_id: 1,
            home_url: home_url.to_string(),
            scroll_template,
        };
        let first = mgr.blank_tab();
        mgr.tabs.push(first);
        mgr
    }

    /// Append a home tab and make it current.
    pub fn new_tab(&mut self) -> TabId {
        self.push_tab(false)
    }

    /// Like [`new_tab`](Self::new_tab), but the tab is flagged private.
    pub fn new_private_tab(&mut self) -> TabId {
        self.push_tab(true)
    }

    /// Close the tab at `index`.
    ///
    /// Closing the only tab replaces it with a fresh home tab. Closing a
    /// tab before the current one keeps the same tab current.
    pub fn close_tab(&mut self, index: usize) -> CloseOutcome {
        if index >= self.tabs.len() {
            return CloseOutcome::Ignored;
        }
        if self.tabs.len() == 1 {
            self.tabs[0] = self.blank_tab();
            self.current = 0;
            log::info!("closed last tab, replaced with tab {}", self.tabs[0].id.get());
            return CloseOutcome::Replaced;
        }

        let closed = self.tabs.remove(index);
        if index < self.current {
            self.current -= 1;
        }
        self.current = self.current.min(self.tabs.len() - 1);
        log::info!("closed tab {} ({} left)", closed.id.get(), self.tabs.len());
        CloseOutcome::Removed
    }

    /// Make `index` current. Returns `false` if out of range.
    pub fn switch_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.current = index;
        true
    }

    pub fn current(&self) -> &Tab {
        &self.tabs[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Tab {
        &mut self.tabs[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> impl Iterator<Item = &mut Tab> {
        self.tabs.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Current index of the tab with handle `id`.
    pub fn find(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    /// Viewport height for tabs created from now on.
    pub fn set_viewport_height(&mut self, height: i32) {
        self.scroll_template.viewport_height = height;
    }

    fn push_tab(&mut self, private: bool) -> TabId {
        let mut tab = self.blank_tab();
        tab.private = private;
        let id = tab.id;
        self.tabs.push(tab);
        self.current = self.tabs.len() - 1;
        let kind = if private { "private tab" } else { "tab" };
        log::info!("opened {kind} {} ({} total)", id.get(), self.tabs.len());
        id
    }

    fn blank_tab(&mut self) -> Tab {
        let id = TabId::new(self.next_id);
        self.next_id += 1;
        let mut scroll = self.scroll_template.clone();
        scroll.reset(0);
        Tab::new(id, &self.home_url, scroll)
    }
}
