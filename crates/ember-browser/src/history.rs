//! Per-tab back/forward history.

/// Linear history with a cursor.
///
/// `visited[cursor]` is the page being shown. Pushing while the cursor
/// is not at the end discards the forward entries first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationHistory {
    visited: Vec<String>,
    cursor: usize,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new page and make it current.
    pub fn push(&mut self, url: &str) {
        if !self.visited.is_empty() {
            self.visited.truncate(self.cursor + 1);
        }
        self.visited.push(url.to_string());
        self.cursor = self.visited.len() - 1;
    }

    /// Step back. Returns the URL to load, or `None` at the start.
    pub fn back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step forward. Returns the URL to load, or `None` at the end.
    pub fn forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn current(&self) -> Option<&str> {
        self.visited.get(self.cursor).map(String::as_str)
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.visited.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.visited
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
