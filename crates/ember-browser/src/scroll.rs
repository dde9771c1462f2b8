//! Viewport and scroll offset management.

/// Scroll amounts for different input types.
pub const SCROLL_LINE: i32 = 24;
pub const SCROLL_WHEEL: i32 = 48;
pub const SCROLL_PAGE_FRACTION: f32 = 0.9;

/// Clamp `scroll` into `[0, max(0, content - visible)]`.
pub fn clamp(scroll: i32, content: i32, visible: i32) -> i32 {
    scroll.clamp(0, max_scroll(content, visible))
}

pub fn max_scroll(content: i32, visible: i32) -> i32 {
    content.saturating_sub(visible).max(0)
}

/// Scrollbar thumb as `(start, end)` fractions of the track.
///
/// `(0.0, 1.0)` when the content fits in the viewport.
pub fn thumb(scroll: i32, content: i32, visible: i32) -> (f32, f32) {
    if content <= visible || content <= 0 {
        return (0.0, 1.0);
    }
    let content = content as f32;
    let start = scroll as f32 / content;
    let end = ((scroll as f32 + visible as f32) / content).min(1.0);
    (start, end)
}

/// Scroll position of one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    /// Current vertical offset in pixels.
    pub scroll_y: i32,
    /// Total content height (from layout).
    pub content_height: i32,
    /// Visible viewport height.
    pub viewport_height: i32,
    /// Pixels per line step.
    pub line_step: i32,
}

impl ScrollState {
    pub fn new(viewport_height: i32) -> Self {
        Self {
            scroll_y: 0,
            content_height: 0,
            viewport_height,
            line_step: SCROLL_LINE,
        }
    }

    pub fn with_line_step(mut self, line_step: i32) -> Self {
        self.line_step = line_step;
        self
    }

    /// Adjust by `delta` pixels (positive scrolls down), then clamp.
    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll_y = self.scroll_y.saturating_add(delta);
        self.clamp();
    }

    pub fn line_up(&mut self) {
        self.scroll_by(-self.line_step);
    }

    pub fn line_down(&mut self) {
        self.scroll_by(self.line_step);
    }

    /// Mouse wheel; `notches` is positive for downward motion.
    pub fn wheel(&mut self, notches: i32) {
        self.scroll_by(notches.saturating_mul(SCROLL_WHEEL));
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-self.page_amount());
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.page_amount());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_y = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_y = self.max_scroll();
    }

    /// Jump to `fraction` of the content height. Used when dragging
    /// the scrollbar.
    pub fn scroll_to_fraction(&mut self, fraction: f32) {
        self.scroll_y = (fraction * self.content_height as f32) as i32;
        self.clamp();
    }

    /// Back to the top for a freshly loaded page.
    pub fn reset(&mut self, content_height: i32) {
        self.content_height = content_height;
        self.scroll_y = 0;
    }

    pub fn set_content_height(&mut self, h: i32) {
        self.content_height = h;
        self.clamp();
    }

    pub fn set_viewport_height(&mut self, h: i32) {
        self.viewport_height = h;
        self.clamp();
    }

    pub fn max_scroll(&self) -> i32 {
        max_scroll(self.content_height, self.viewport_height)
    }

    pub fn thumb(&self) -> (f32, f32) {
        thumb(self.scroll_y, self.content_height, self.viewport_height)
    }

    fn page_amount(&self) -> i32 {
        (self.viewport_height as f32 * SCROLL_PAGE_FRACTION).round() as i32
    }

    fn clamp(&mut self) {
        self.scroll_y = clamp(self.scroll_y, self.content_height, self.viewport_height);
    }
}
