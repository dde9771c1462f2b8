//! The browsing session: tabs, loading, and input handling.
//!
//! [`Browser`] is what a front end drives. It owns the tab strip, the
//! bookmark list, and the visited log, and runs the fetch → tokenize →
//! layout pipeline whenever the current tab navigates. Drawing is left
//! to the caller: read [`Browser::current_tab`] for the display list,
//! link regions, and scroll offset.

use ember_net::{Fetch, ParsedUrl};

use crate::config::BrowserConfig;
use crate::home::{HOME_URL, home_page_html, is_home};
use crate::layout::{LayoutConfig, LayoutResult, SimpleTextMeasurer, TextMeasurer, layout_with};
use crate::omnibox::normalize_input;
use crate::scroll::ScrollState;
use crate::tabs::{CloseOutcome, Tab, TabId, TabManager};
use crate::tokenizer::{extract_title, tokenize};
use crate::url_list::UrlList;

pub struct Browser {
    config: BrowserConfig,
    fetcher: Box<dyn Fetch>,
    measurer: Box<dyn TextMeasurer>,
    tabs: TabManager,
    bookmarks: UrlList,
    visited: UrlList,
    viewport_width: i32,
    viewport_height: i32,
}

impl Browser {
    /// A session with one tab showing the home page.
    pub fn new(config: BrowserConfig, fetcher: Box<dyn Fetch>) -> Self {
        let scroll = ScrollState::new(config.viewport_height).with_line_step(config.scroll_line);
        let mut browser = Self {
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            tabs: TabManager::new(HOME_URL, scroll),
            config,
            fetcher,
            measurer: Box::new(SimpleTextMeasurer),
            bookmarks: UrlList::new(),
            visited: UrlList::new(),
        };
        browser.load(HOME_URL, true);
        browser
    }

    /// Use the renderer's own font metrics. Re-lays out every tab.
    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self.relayout_all();
        self
    }

    /// Start from previously saved lists.
    pub fn with_lists(mut self, bookmarks: UrlList, visited: UrlList) -> Self {
        self.bookmarks = bookmarks;
        self.visited = visited;
        self.refresh_home_tabs();
        self
    }

    // -- Navigation ---------------------------------------------------

    /// Load `url` into the current tab and record it in history.
    pub fn navigate(&mut self, url: &str) {
        self.load(url, true);
    }

    /// Navigate from URL-bar text. Returns the URL actually loaded, or
    /// `None` for blank input.
    pub fn navigate_input(&mut self, input: &str) -> Option<String> {
        let url = normalize_input(input, &self.config.search_url)?;
        self.navigate(&url);
        Some(url)
    }

    /// Returns `false` when there is nothing to go back to.
    pub fn back(&mut self) -> bool {
        let Some(url) = self.tabs.current_mut().history.back().map(str::to_owned) else {
            return false;
        };
        self.load(&url, false);
        true
    }

    pub fn forward(&mut self) -> bool {
        let Some(url) = self.tabs.current_mut().history.forward().map(str::to_owned) else {
            return false;
        };
        self.load(&url, false);
        true
    }

    /// Fetch the current page again without touching history.
    pub fn reload(&mut self) {
        let url = self.tabs.current().url.clone();
        self.load(&url, false);
    }

    pub fn go_home(&mut self) {
        self.navigate(HOME_URL);
    }

    // -- Scrolling and pointer input ------------------------------------

    pub fn scroll_by(&mut self, delta: i32) {
        self.tabs.current_mut().scroll.scroll_by(delta);
    }

    pub fn scroll_to_fraction(&mut self, fraction: f32) {
        self.tabs.current_mut().scroll.scroll_to_fraction(fraction);
    }

    /// Direct access for line/page/wheel steps.
    pub fn scroll_mut(&mut self) -> &mut ScrollState {
        &mut self.tabs.current_mut().scroll
    }

    /// Link under a viewport point, as written in the page. Points
    /// outside the viewport never hit.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<&str> {
        if !(0..self.viewport_width).contains(&x) || !(0..self.viewport_height).contains(&y) {
            return None;
        }
        let tab = self.tabs.current();
        tab.layout.hit_test(x, y.saturating_add(tab.scroll.scroll_y))
    }

    /// Follow the link under a viewport point. Returns the URL loaded.
    pub fn click(&mut self, x: i32, y: i32) -> Option<String> {
        let href = self.hit_test(x, y)?;
        let url = resolve_link(&self.tabs.current().url, href);
        log::info!("clicked link to {url}");
        self.navigate(&url);
        Some(url)
    }

    // -- Tabs -----------------------------------------------------------

    /// Open a home tab and switch to it.
    pub fn new_tab(&mut self) -> TabId {
        let id = self.tabs.new_tab();
        self.load(HOME_URL, true);
        id
    }

    /// Open a home tab whose loads stay out of the visited log.
    pub fn new_private_tab(&mut self) -> TabId {
        let id = self.tabs.new_private_tab();
        self.load(HOME_URL, true);
        id
    }

    pub fn close_tab(&mut self, index: usize) -> CloseOutcome {
        let outcome = self.tabs.close_tab(index);
        if outcome == CloseOutcome::Replaced {
            self.load(HOME_URL, true);
        }
        outcome
    }

    /// Change the current tab. Nothing is fetched or laid out.
    pub fn switch_tab(&mut self, index: usize) -> bool {
        self.tabs.switch_tab(index)
    }

    /// New viewport size. Every tab is laid out again from its stored
    /// tokens and its scroll offset re-clamped.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.tabs.set_viewport_height(height);
        self.relayout_all();
    }

    // -- Bookmarks and visited log --------------------------------------

    /// Bookmark the current page. Returns `false` if it is already
    /// bookmarked or is the home page.
    pub fn add_bookmark(&mut self) -> bool {
        let url = self.tabs.current().url.clone();
        if is_home(&url) || !self.bookmarks.add(&url) {
            return false;
        }
        log::info!("bookmarked {url}");
        self.refresh_home_tabs();
        true
    }

    pub fn bookmarks(&self) -> &UrlList {
        &self.bookmarks
    }

    /// Every page loaded successfully outside private tabs, oldest
    /// first, without repeats.
    pub fn visited(&self) -> &UrlList {
        &self.visited
    }

    // -- Accessors --------------------------------------------------------

    pub fn current_tab(&self) -> &Tab {
        self.tabs.current()
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn viewport(&self) -> (i32, i32) {
        (self.viewport_width, self.viewport_height)
    }

    // -- Pipeline ---------------------------------------------------------

    fn load(&mut self, url: &str, push: bool) {
        log::info!("loading {url}");
        let source = if is_home(url) {
            Ok(home_page_html(self.bookmarks.as_slice()))
        } else {
            self.fetcher.fetch(url)
        };

        let tab = self.tabs.current_mut();
        if push {
            tab.history.push(url);
        }
        tab.url = url.to_string();

        match source {
            Ok(html) => {
                tab.tokens = tokenize(&html);
                tab.title = extract_title(&tab.tokens).unwrap_or_else(|| url.to_string());
                tab.error = None;
                if !is_home(url) && !tab.private {
                    self.visited.add(url);
                }
            },
            Err(e) => {
                log::warn!("failed to load {url}: {e}");
                tab.tokens.clear();
                tab.title = url.to_string();
                tab.error = Some(e.to_string());
            },
        }

        tab.layout = render(tab, self.viewport_width, &self.config.layout, &*self.measurer);
        tab.scroll.reset(tab.layout.content_height);
        log::debug!(
            "{url}: {} fragments, {} links, height {}",
            tab.layout.fragments.len(),
            tab.layout.links.len(),
            tab.layout.content_height
        );
    }

    fn relayout_all(&mut self) {
        let width = self.viewport_width;
        let height = self.viewport_height;
        for tab in self.tabs.tabs_mut() {
            tab.layout = render(tab, width, &self.config.layout, &*self.measurer);
            tab.scroll.viewport_height = height;
            tab.scroll.set_content_height(tab.layout.content_height);
        }
    }

    /// Regenerate tabs showing the home page after the bookmarks change.
    fn refresh_home_tabs(&mut self) {
        let tokens = tokenize(&home_page_html(self.bookmarks.as_slice()));
        let width = self.viewport_width;
        for tab in self.tabs.tabs_mut() {
            if is_home(&tab.url) && !tab.is_error() {
                tab.tokens = tokens.clone();
                tab.layout = render(tab, width, &self.config.layout, &*self.measurer);
                tab.scroll.set_content_height(tab.layout.content_height);
            }
        }
    }
}

fn render(tab: &Tab, width: i32, config: &LayoutConfig, measurer: &dyn TextMeasurer) -> LayoutResult {
    match &tab.error {
        Some(message) => LayoutResult::error(message, config, measurer),
        None => layout_with(&tab.tokens, width, measurer, config),
    }
}

/// Absolute URL for a link found on the page at `base`.
fn resolve_link(base: &str, href: &str) -> String {
    if is_home(base) {
        return href.to_string();
    }
    ParsedUrl::parse(base).join(href)
}
