//! # Text Renderer Host
//!
//! This crate provides the headless console surface and a plain-text renderer.
//!
//! ## Philosophy
//!
//! - **Rendering is a host concern**, not a controller concern
//! - **Surface state is plain data**: input line, alternatives, scrollback
//! - **Frames are rendered, not streamed**: each render is a complete frame
//! - **Renderer is NOT a terminal**: no ANSI, no cursor addressing, no terminal state
//!
//! ## Responsibilities
//!
//! The surface:
//! - Holds the editable input line and queues submit / text-changed events
//! - Shows the alternatives panel the controller fills
//! - Keeps a bounded output scrollback
//!
//! The renderer turns a surface into a text frame. It does NOT mutate the
//! surface or interpret commands.

pub mod input_line;
pub mod scrollback;

pub use input_line::InputLine;
pub use scrollback::{OutputLine, ScrollbackBuffer};

use console_core::{ConsoleSurface, OutputColor, SurfaceEvent};
use services_input::TextEdit;

/// Default separator width
const SEPARATOR_WIDTH: usize = 40;

/// Default number of output rows shown in a frame
pub const DEFAULT_VIEWPORT_ROWS: usize = 12;

/// Headless console surface
///
/// Every call to [`ConsoleSurface::set_input_text`] and every edit that changes
/// the text takes the next revision. Events are queued until drained.
pub struct TextSurface {
    input: InputLine,
    revision: u64,
    events: Vec<SurfaceEvent>,
    focused: bool,
    editing: bool,
    alternatives_active: bool,
    alternatives_index: usize,
    alternatives: Vec<String>,
    output: ScrollbackBuffer,
}

impl TextSurface {
    /// Creates a surface keeping at most `output_capacity` output lines
    pub fn new(output_capacity: usize) -> Self {
        Self::with_viewport(DEFAULT_VIEWPORT_ROWS, output_capacity)
    }

    pub fn with_viewport(viewport_rows: usize, output_capacity: usize) -> Self {
        Self {
            input: InputLine::new(),
            revision: 0,
            events: Vec::new(),
            focused: false,
            editing: false,
            alternatives_active: false,
            alternatives_index: 0,
            alternatives: Vec::new(),
            output: ScrollbackBuffer::new(viewport_rows, output_capacity),
        }
    }

    /// True when keystrokes reach the input line
    pub fn is_editing(&self) -> bool {
        self.focused && self.editing
    }

    /// Applies a user edit
    ///
    /// Ignored unless the field is editing. Returns true if it had an effect.
    pub fn apply_edit(&mut self, edit: TextEdit) -> bool {
        if !self.is_editing() {
            return false;
        }

        match edit {
            TextEdit::Insert(ch) => {
                self.input.insert(ch);
                self.text_edited();
                true
            }
            TextEdit::Backspace => {
                let changed = self.input.backspace();
                if changed {
                    self.text_edited();
                }
                changed
            }
            TextEdit::Delete => {
                let changed = self.input.delete();
                if changed {
                    self.text_edited();
                }
                changed
            }
            TextEdit::CursorLeft => {
                self.input.move_left();
                true
            }
            TextEdit::CursorRight => {
                self.input.move_right();
                true
            }
            TextEdit::CursorHome => {
                self.input.move_home();
                true
            }
            TextEdit::CursorEnd => {
                self.input.move_end();
                true
            }
            TextEdit::Submit => {
                self.events
                    .push(SurfaceEvent::Submitted(self.input.text().to_string()));
                true
            }
        }
    }

    /// Types each character of `text`
    pub fn type_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.apply_edit(TextEdit::Insert(ch));
        }
    }

    pub fn input(&self) -> &InputLine {
        &self.input
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Events queued and not yet drained
    pub fn pending_events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    pub fn scrollback(&self) -> &ScrollbackBuffer {
        &self.output
    }

    pub fn scroll_output_up(&mut self, lines: usize) -> bool {
        self.output.scroll_up(lines)
    }

    pub fn scroll_output_down(&mut self, lines: usize) -> bool {
        self.output.scroll_down(lines)
    }

    fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    fn text_edited(&mut self) {
        let revision = self.next_revision();
        self.events.push(SurfaceEvent::TextChanged {
            text: self.input.text().to_string(),
            revision,
        });
    }
}

impl ConsoleSurface for TextSurface {
    fn input_text(&self) -> &str {
        self.input.text()
    }

    fn set_input_text(&mut self, text: &str) -> u64 {
        let revision = self.next_revision();
        if self.input.set_text(text) {
            self.events.push(SurfaceEvent::TextChanged {
                text: text.to_string(),
                revision,
            });
        }
        revision
    }

    fn is_input_focused(&self) -> bool {
        self.focused
    }

    fn is_alternatives_active(&self) -> bool {
        self.alternatives_active
    }

    fn set_alternatives_active(&mut self, active: bool) {
        self.alternatives_active = active;
    }

    fn alternatives_index(&self) -> usize {
        self.alternatives_index
    }

    fn set_alternatives_index(&mut self, index: usize) {
        self.alternatives_index = index;
    }

    fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    fn set_alternatives(&mut self, alternatives: Vec<String>) {
        self.alternatives = alternatives;
    }

    fn activate_input(&mut self) {
        self.editing = true;
    }

    fn quit_focus(&mut self) {
        self.focused = false;
        self.editing = false;
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn move_cursor_to_end(&mut self) {
        self.input.move_end();
    }

    fn set_cursor_position(&mut self, position: usize) {
        self.input.set_cursor(position);
    }

    fn output(&mut self, message: &str, color: OutputColor) {
        self.output.push(message, color);
    }

    fn clear(&mut self) {
        self.output.clear();
    }

    fn move_scroll_to_end(&mut self) {
        self.output.scroll_to_bottom();
    }

    fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Rendering statistics for the last frame
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of characters written in the last frame
    pub chars_written_per_frame: usize,
    /// Number of lines in the last frame
    pub lines_per_frame: usize,
}

/// Text renderer that converts a surface into a frame
#[derive(Debug, Default)]
pub struct TextRenderer {
    stats: RenderStats,
}

impl TextRenderer {
    /// Creates a new text renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the latest rendering statistics
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Renders the surface, with an optional status line at the bottom
    ///
    /// Layout, top to bottom: visible output lines, separator, input line
    /// (`|` marks the edit cursor while editing), alternatives panel when
    /// active (`*` marks the selection), separator, status.
    pub fn render(&mut self, surface: &TextSurface, status: Option<&str>) -> String {
        let mut lines: Vec<String> = surface
            .scrollback()
            .visible_lines()
            .map(OutputLine::to_marked)
            .collect();

        if lines.is_empty() {
            lines.push("(no output)".to_string());
        }

        lines.push("─".repeat(SEPARATOR_WIDTH));
        lines.push(Self::render_input(surface));

        if surface.is_alternatives_active() {
            for (idx, alternative) in surface.alternatives().iter().enumerate() {
                let marker = if idx == surface.alternatives_index() {
                    '*'
                } else {
                    ' '
                };
                lines.push(format!("  {} {}", marker, alternative));
            }
        }

        if let Some(status) = status {
            lines.push("─".repeat(SEPARATOR_WIDTH));
            lines.push(format!("[STATUS] {}", status));
        }

        let mut output = lines.join("\n");
        output.push('\n');

        self.stats = RenderStats {
            chars_written_per_frame: output.chars().count(),
            lines_per_frame: lines.len(),
        };

        output
    }

    fn render_input(surface: &TextSurface) -> String {
        let prompt = if surface.is_input_focused() { ">" } else { " " };
        if surface.is_editing() {
            format!("{} {}", prompt, surface.input().with_cursor_marker())
        } else {
            format!("{} {}", prompt, surface.input().text())
        }
    }
}
