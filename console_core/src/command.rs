//! Command-system collaborator

use crate::output::OutputSink;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Text written into the input field when accepted
    pub label: String,
    /// Short help shown next to the label
    pub description: String,
}

impl Candidate {
    /// Creates a new candidate
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.description)
    }
}

/// Executes and looks up commands on behalf of the console
///
/// Failures are reported as `false`, never as panics or errors; the console
/// only uses the flag to decide whether the text goes into history.
pub trait CommandSystem {
    /// Runs a submitted line, returning true on success
    fn execute(&mut self, text: &str) -> bool;

    /// Returns up to `max_results` ranked candidates for a partial command name
    fn query(&self, text: &str, max_results: usize) -> Vec<Candidate>;

    /// Hands over the sink for messages the command system prints itself
    fn attach_output(&mut self, sink: OutputSink);
}
