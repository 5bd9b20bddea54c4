//! Console snapshot for deterministic testing

use serde::{Deserialize, Serialize};

/// Interaction state derived from the session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsoleState {
    /// Input field does not have focus
    Unfocused,
    /// Focused, arrow keys recall history
    Typing,
    /// Focused, arrow keys move over the candidate list
    Browsing,
}

impl ConsoleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleState::Unfocused => "UNFOCUSED",
            ConsoleState::Typing => "TYPING",
            ConsoleState::Browsing => "BROWSING",
        }
    }
}

/// Complete console state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSnapshot {
    pub state: ConsoleState,
    pub input_text: String,
    pub history: Vec<String>,
    pub history_cursor: Option<usize>,
    pub candidates: Vec<String>,
    pub selected: usize,
    pub recall_pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_strings() {
        assert_eq!(ConsoleState::Unfocused.as_str(), "UNFOCUSED");
        assert_eq!(ConsoleState::Typing.as_str(), "TYPING");
        assert_eq!(ConsoleState::Browsing.as_str(), "BROWSING");
    }
}
