//! Output channel from the command system to the console
//!
//! The command system holds a cloned [`OutputSink`]; the controller owns the
//! matching [`OutputQueue`] and drains it onto the surface every tick.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

/// Color hint for an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputColor {
    #[default]
    Default,
    /// Echo of the submitted line
    Echo,
    /// Command failure
    Error,
    /// Confirmation
    Success,
    /// Help / informational text
    Info,
}

/// A single message destined for the output panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputMessage {
    pub text: String,
    pub color: OutputColor,
}

impl OutputMessage {
    pub fn new(text: impl Into<String>, color: OutputColor) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Sending half handed to the command system
#[derive(Debug, Clone)]
pub struct OutputSink {
    sender: Sender<OutputMessage>,
}

impl OutputSink {
    /// Queues a message; silently dropped once the console is gone
    pub fn print(&self, text: impl Into<String>, color: OutputColor) {
        let _ = self.sender.send(OutputMessage::new(text, color));
    }

    pub fn info(&self, text: impl Into<String>) {
        self.print(text, OutputColor::Info);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.print(text, OutputColor::Error);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.print(text, OutputColor::Success);
    }
}

/// Receiving half owned by the controller
#[derive(Debug)]
pub struct OutputQueue {
    receiver: Receiver<OutputMessage>,
}

impl OutputQueue {
    /// Drains every message queued so far without blocking
    pub fn drain(&self) -> Vec<OutputMessage> {
        self.receiver.try_iter().collect()
    }
}

/// Creates a connected sink/queue pair
pub fn channel() -> (OutputSink, OutputQueue) {
    let (sender, receiver) = mpsc::channel();
    (OutputSink { sender }, OutputQueue { receiver })
}
