//! Vertical scroll state shared by the panes

/// Scroll position over a fixed number of content lines
#[derive(Debug, Default)]
pub struct ScrollState {
    /// Current scroll offset (lines from top)
    pub scroll_offset: u16,
    /// Total number of lines in content
    pub total_lines: usize,
    /// Visible height
    pub visible_height: u16,
}

impl ScrollState {
    /// Create a new state
    pub fn new() -> Self {
        Self::default()
    }

    /// Update content size
    pub fn set_content(&mut self, total_lines: usize, visible_height: u16) {
        self.total_lines = total_lines;
        self.visible_height = visible_height;

        // Ensure scroll is still valid
        self.clamp_scroll();
    }

    /// Scroll up by n lines
    pub fn scroll_up(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    /// Scroll down by n lines
    pub fn scroll_down(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(n);
        self.clamp_scroll();
    }

    /// Page up
    pub fn page_up(&mut self) {
        let page = self.visible_height.saturating_sub(2);
        self.scroll_up(page);
    }

    /// Page down
    pub fn page_down(&mut self) {
        let page = self.visible_height.saturating_sub(2);
        self.scroll_down(page);
    }

    /// Scroll to top
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    fn max_scroll(&self) -> u16 {
        self.total_lines
            .saturating_sub(self.visible_height as usize)
            .min(u16::MAX as usize) as u16
    }

    /// Ensure scroll offset is within valid range
    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Check if we can scroll down
    pub fn can_scroll_down(&self) -> bool {
        self.scroll_offset < self.max_scroll()
    }
}
