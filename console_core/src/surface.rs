//! Renderer / input-surface collaborator

use crate::output::OutputColor;
use serde::{Deserialize, Serialize};

/// Event raised by the input surface
///
/// Surfaces queue these instead of calling back into the controller; the
/// controller drains them at the start of every tick and right after each of
/// its own writes, so they are observed in the order they were produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// The user pressed submit with this text
    Submitted(String),
    /// The input text changed; `revision` is the write that produced it
    TextChanged { text: String, revision: u64 },
}

/// Text input field, alternatives panel and output panel
pub trait ConsoleSurface {
    /// Current input text
    fn input_text(&self) -> &str;

    /// Replaces the input text and returns the revision of this write
    ///
    /// Revisions increase monotonically. A write that changes the text queues
    /// a `TextChanged` event carrying the same revision; a write that leaves
    /// the text unchanged queues nothing.
    fn set_input_text(&mut self, text: &str) -> u64;

    fn is_input_focused(&self) -> bool;

    fn is_alternatives_active(&self) -> bool;
    fn set_alternatives_active(&mut self, active: bool);

    fn alternatives_index(&self) -> usize;
    fn set_alternatives_index(&mut self, index: usize);

    fn alternatives(&self) -> &[String];
    fn set_alternatives(&mut self, alternatives: Vec<String>);

    /// Puts the field into edit mode
    fn activate_input(&mut self);
    /// Leaves edit mode and drops keyboard focus
    fn quit_focus(&mut self);
    /// Grabs keyboard focus for the field
    fn focus(&mut self);

    fn move_cursor_to_end(&mut self);
    fn set_cursor_position(&mut self, position: usize);

    /// Appends a single message to the output panel
    fn output(&mut self, message: &str, color: OutputColor);

    /// Appends several messages to the output panel
    fn output_batch(&mut self, messages: &[String], color: OutputColor) {
        for message in messages {
            self.output(message, color);
        }
    }

    /// Clears the output panel
    fn clear(&mut self);

    fn move_scroll_to_end(&mut self);

    /// Takes every queued event, oldest first
    fn drain_events(&mut self) -> Vec<SurfaceEvent>;
}
