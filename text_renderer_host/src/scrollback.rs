//! # Output Scrollback
//!
//! Bounded history of output lines with a viewport.
//!
//! ## Design
//!
//! - Oldest lines are dropped once `max_lines` is reached
//! - Viewport offset counts lines up from the bottom (0 = newest visible)
//! - Each line keeps its color so the renderer can mark it

use console_core::OutputColor;
use std::collections::VecDeque;

/// A line of output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    pub color: OutputColor,
}

impl OutputLine {
    pub fn new(text: impl Into<String>, color: OutputColor) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }

    /// Render with a visual marker for the color
    pub fn to_marked(&self) -> String {
        match self.color {
            OutputColor::Default => self.text.clone(),
            OutputColor::Echo => format!("> {}", self.text),
            OutputColor::Error => format!("[ERROR] {}", self.text),
            OutputColor::Success => format!("[OK] {}", self.text),
            OutputColor::Info => format!("[INFO] {}", self.text),
        }
    }
}

/// Scrollback buffer for console output
pub struct ScrollbackBuffer {
    /// Maximum number of lines to store
    max_lines: usize,
    /// Height of visible viewport in rows
    viewport_rows: usize,
    lines: VecDeque<OutputLine>,
    /// Current viewport position (0 = bottom, showing most recent lines)
    viewport_offset: usize,
}

impl ScrollbackBuffer {
    /// Create a new scrollback buffer
    ///
    /// Both sizes are raised to at least 1.
    pub fn new(viewport_rows: usize, max_lines: usize) -> Self {
        Self {
            max_lines: max_lines.max(1),
            viewport_rows: viewport_rows.max(1),
            lines: VecDeque::new(),
            viewport_offset: 0,
        }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    /// Get the total number of lines stored
    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// Get the current viewport offset from the bottom
    pub fn viewport_offset(&self) -> usize {
        self.viewport_offset
    }

    /// Appends one line per `\n`-separated segment
    ///
    /// The viewport keeps its position; only an explicit scroll moves it.
    pub fn push(&mut self, text: &str, color: OutputColor) {
        if text.is_empty() {
            self.push_line(OutputLine::new("", color));
            return;
        }
        for segment in text.lines() {
            self.push_line(OutputLine::new(segment, color));
        }
    }

    fn push_line(&mut self, line: OutputLine) {
        if self.lines.len() == self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
        // A scrolled-up viewport stays on the same content
        if self.viewport_offset > 0 {
            self.viewport_offset = (self.viewport_offset + 1).min(self.max_scroll_up());
        }
    }

    /// Scroll viewport up (show older content)
    ///
    /// Returns true if scrolling occurred
    pub fn scroll_up(&mut self, lines: usize) -> bool {
        let target = (self.viewport_offset + lines).min(self.max_scroll_up());
        let moved = target != self.viewport_offset;
        self.viewport_offset = target;
        moved
    }

    /// Scroll viewport down (show newer content)
    ///
    /// Returns true if scrolling occurred
    pub fn scroll_down(&mut self, lines: usize) -> bool {
        if self.viewport_offset > 0 {
            self.viewport_offset = self.viewport_offset.saturating_sub(lines);
            true
        } else {
            false
        }
    }

    /// Scroll to bottom (show most recent content)
    pub fn scroll_to_bottom(&mut self) {
        self.viewport_offset = 0;
    }

    fn max_scroll_up(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport_rows)
    }

    /// Lines inside the current viewport, oldest first
    pub fn visible_lines(&self) -> impl Iterator<Item = &OutputLine> {
        let end = self.lines.len() - self.viewport_offset;
        let start = end.saturating_sub(self.viewport_rows);
        self.lines.range(start..end)
    }

    /// Every stored line, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    /// Clear all content
    pub fn clear(&mut self) {
        self.lines.clear();
        self.viewport_offset = 0;
    }

    /// Check if at bottom of buffer
    pub fn at_bottom(&self) -> bool {
        self.viewport_offset == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(buffer: &ScrollbackBuffer) -> Vec<&str> {
        buffer.visible_lines().map(|line| line.text.as_str()).collect()
    }

    #[test]
    fn test_marked_rendering() {
        assert_eq!(OutputLine::new("x", OutputColor::Default).to_marked(), "x");
        assert_eq!(OutputLine::new("x", OutputColor::Echo).to_marked(), "> x");
        assert_eq!(OutputLine::new("x", OutputColor::Error).to_marked(), "[ERROR] x");
        assert_eq!(OutputLine::new("x", OutputColor::Success).to_marked(), "[OK] x");
        assert_eq!(OutputLine::new("x", OutputColor::Info).to_marked(), "[INFO] x");
    }

    #[test]
    fn test_push_splits_lines() {
        let mut buffer = ScrollbackBuffer::new(10, 100);
        buffer.push("one\ntwo", OutputColor::Info);
        buffer.push("", OutputColor::Echo);
        assert_eq!(buffer.total_lines(), 3);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut buffer = ScrollbackBuffer::new(10, 2);
        for text in ["a", "b", "c"] {
            buffer.push(text, OutputColor::Default);
        }
        let all: Vec<&str> = buffer.lines().map(|line| line.text.as_str()).collect();
        assert_eq!(all, vec!["b", "c"]);
    }

    #[test]
    fn test_viewport_shows_newest() {
        let mut buffer = ScrollbackBuffer::new(2, 100);
        for text in ["a", "b", "c"] {
            buffer.push(text, OutputColor::Default);
        }
        assert_eq!(texts(&buffer), vec!["b", "c"]);
    }

    #[test]
    fn test_scroll_up_and_back() {
        let mut buffer = ScrollbackBuffer::new(2, 100);
        for text in ["a", "b", "c", "d"] {
            buffer.push(text, OutputColor::Default);
        }

        assert!(buffer.scroll_up(5));
        assert_eq!(buffer.viewport_offset(), 2);
        assert_eq!(texts(&buffer), vec!["a", "b"]);
        assert!(!buffer.scroll_up(1));

        // New output does not yank the viewport
        buffer.push("e", OutputColor::Default);
        assert_eq!(texts(&buffer), vec!["a", "b"]);

        buffer.scroll_to_bottom();
        assert!(buffer.at_bottom());
        assert_eq!(texts(&buffer), vec!["d", "e"]);
        assert!(!buffer.scroll_down(1));
    }

    #[test]
    fn test_clear() {
        let mut buffer = ScrollbackBuffer::new(2, 100);
        buffer.push("a", OutputColor::Default);
        buffer.clear();
        assert_eq!(buffer.total_lines(), 0);
        assert_eq!(buffer.visible_lines().count(), 0);
    }
}
