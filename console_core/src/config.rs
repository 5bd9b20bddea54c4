//! Console configuration

use serde::{Deserialize, Serialize};

/// Tunables for one console session
///
/// Every field is optional when deserialized; missing fields take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Number of submitted commands kept for recall
    pub history_capacity: usize,
    /// Maximum number of autocomplete candidates shown
    pub max_alternatives: usize,
    /// Whether commands that report failure still enter history
    pub record_failed_commands: bool,
    /// Number of lines kept by the output panel
    pub output_capacity: usize,
    /// Whether output lines are prefixed with `[H:M:S] `
    pub timestamp_output: bool,
}

impl ConsoleConfig {
    pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
    pub const DEFAULT_MAX_ALTERNATIVES: usize = 8;
    pub const DEFAULT_OUTPUT_CAPACITY: usize = 400;

    /// Returns a copy with every count raised to at least 1
    pub fn clamped(mut self) -> Self {
        self.history_capacity = self.history_capacity.max(1);
        self.max_alternatives = self.max_alternatives.max(1);
        self.output_capacity = self.output_capacity.max(1);
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_max_alternatives(mut self, count: usize) -> Self {
        self.max_alternatives = count;
        self
    }

    pub fn with_record_failed_commands(mut self, record: bool) -> Self {
        self.record_failed_commands = record;
        self
    }

    pub fn with_output_capacity(mut self, capacity: usize) -> Self {
        self.output_capacity = capacity;
        self
    }

    pub fn with_timestamp_output(mut self, enabled: bool) -> Self {
        self.timestamp_output = enabled;
        self
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            history_capacity: Self::DEFAULT_HISTORY_CAPACITY,
            max_alternatives: Self::DEFAULT_MAX_ALTERNATIVES,
            record_failed_commands: true,
            output_capacity: Self::DEFAULT_OUTPUT_CAPACITY,
            timestamp_output: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.max_alternatives, 8);
        assert!(config.record_failed_commands);
        assert_eq!(config.output_capacity, 400);
        assert!(config.timestamp_output);
    }

    #[test]
    fn test_clamped_raises_zero_counts() {
        let config = ConsoleConfig::default()
            .with_history_capacity(0)
            .with_max_alternatives(0)
            .with_output_capacity(0)
            .clamped();
        assert_eq!(config.history_capacity, 1);
        assert_eq!(config.max_alternatives, 1);
        assert_eq!(config.output_capacity, 1);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: ConsoleConfig =
            serde_json::from_str(r#"{ "history_capacity": 5, "timestamp_output": false }"#)
                .unwrap();
        assert_eq!(config.history_capacity, 5);
        assert!(!config.timestamp_output);
        assert_eq!(config.max_alternatives, 8);
        assert!(config.record_failed_commands);
    }
}
