//! # Settings Registry Service
//!
//! A typed, layered settings system for the console.
//!
//! ## Philosophy
//!
//! - **Typed settings**: All settings have explicit types, not stringly-typed
//! - **Layered**: Read-only defaults + overrides
//! - **Deterministic**: Settings are serializable and reproducible
//! - **Testable**: All settings logic can be tested independently
//!
//! ## Features
//!
//! - Read-only defaults baked in
//! - Overrides loaded from a JSON file or set from text
//! - Conversion into [`console_core::ConsoleConfig`]
//! - No global config files, no environment variables
//!
//! ## Example
//!
//! ```ignore
//! use services_settings::{create_default_registry, keys, SettingValue};
//!
//! let mut registry = create_default_registry();
//! registry.set_override(keys::CONSOLE_HISTORY_CAPACITY, SettingValue::Integer(10));
//!
//! let config = services_settings::console_config(&registry)?;
//! ```

pub mod config;
pub mod persistence;

pub use config::{console_config, key_names};

use console_core::ConsoleConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Settings error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Setting {key} expects {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to deserialize settings: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),
}

/// Setting key (path-like identifier)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SettingKey(String);

impl SettingKey {
    /// Creates a new setting key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SettingKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Setting value (strongly typed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// String value
    String(String),
    /// List of strings
    StringList(Vec<String>),
}

impl SettingValue {
    /// Name of the value's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Boolean(_) => "boolean",
            SettingValue::Integer(_) => "integer",
            SettingValue::String(_) => "string",
            SettingValue::StringList(_) => "string list",
        }
    }

    /// Returns true if both values hold the same type
    pub fn same_type(&self, other: &SettingValue) -> bool {
        self.type_name() == other.type_name()
    }

    /// Parses `text` as a value of the same type as `self`
    ///
    /// String lists are comma separated.
    pub fn parse_as(&self, text: &str) -> Option<SettingValue> {
        let text = text.trim();
        match self {
            SettingValue::Boolean(_) => match text.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(SettingValue::Boolean(true)),
                "false" | "no" | "off" | "0" => Some(SettingValue::Boolean(false)),
                _ => None,
            },
            SettingValue::Integer(_) => text.parse().ok().map(SettingValue::Integer),
            SettingValue::String(_) => Some(SettingValue::String(text.to_string())),
            SettingValue::StringList(_) => Some(SettingValue::StringList(
                text.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }
}

/// Settings registry
pub struct SettingsRegistry {
    /// Default settings (read-only)
    defaults: BTreeMap<SettingKey, SettingValue>,
    /// Overrides layered on top of the defaults
    overrides: BTreeMap<SettingKey, SettingValue>,
}

impl SettingsRegistry {
    /// Creates a new settings registry
    pub fn new() -> Self {
        Self {
            defaults: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }

    /// Registers a default setting
    pub fn register_default(&mut self, key: impl Into<SettingKey>, value: SettingValue) {
        self.defaults.insert(key.into(), value);
    }

    /// Sets an override
    pub fn set_override(&mut self, key: impl Into<SettingKey>, value: SettingValue) {
        self.overrides.insert(key.into(), value);
    }

    /// Parses `text` against the default's type and stores it as an override
    pub fn set_from_str(&mut self, key: &str, text: &str) -> Result<(), SettingsError> {
        let key = SettingKey::new(key);
        let default = self
            .defaults
            .get(&key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        let value = default
            .parse_as(text)
            .ok_or_else(|| SettingsError::InvalidValue {
                key: key.to_string(),
                value: text.to_string(),
            })?;
        self.overrides.insert(key, value);
        Ok(())
    }

    /// Gets the effective setting value (override or default)
    pub fn get(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.overrides.get(key).or_else(|| self.defaults.get(key))
    }

    /// Gets the default value for a setting
    pub fn get_default(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.defaults.get(key)
    }

    /// Number of overridden settings
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Applies overrides (merges with existing)
    pub fn apply_overrides(&mut self, overrides: BTreeMap<SettingKey, SettingValue>) {
        self.overrides.extend(overrides);
    }
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Common setting keys
pub mod keys {
    pub const CONSOLE_HISTORY_CAPACITY: &str = "console.history_capacity";
    pub const CONSOLE_MAX_ALTERNATIVES: &str = "console.max_alternatives";
    pub const CONSOLE_RECORD_FAILED_COMMANDS: &str = "console.record_failed_commands";
    pub const CONSOLE_OUTPUT_CAPACITY: &str = "console.output_capacity";
    pub const CONSOLE_TIMESTAMP_OUTPUT: &str = "console.timestamp_output";
    pub const KEYS_FOCUS: &str = "console.keys.focus";
    pub const KEYS_QUIT_FOCUS: &str = "console.keys.quit_focus";
    pub const KEYS_MOVE_UP: &str = "console.keys.move_up";
    pub const KEYS_MOVE_DOWN: &str = "console.keys.move_down";
}

/// Creates a settings registry with default settings
pub fn create_default_registry() -> SettingsRegistry {
    let mut registry = SettingsRegistry::new();

    // Console behaviour
    registry.register_default(
        keys::CONSOLE_HISTORY_CAPACITY,
        SettingValue::Integer(ConsoleConfig::DEFAULT_HISTORY_CAPACITY as i64),
    );
    registry.register_default(
        keys::CONSOLE_MAX_ALTERNATIVES,
        SettingValue::Integer(ConsoleConfig::DEFAULT_MAX_ALTERNATIVES as i64),
    );
    registry.register_default(keys::CONSOLE_RECORD_FAILED_COMMANDS, SettingValue::Boolean(true));
    registry.register_default(
        keys::CONSOLE_OUTPUT_CAPACITY,
        SettingValue::Integer(ConsoleConfig::DEFAULT_OUTPUT_CAPACITY as i64),
    );
    registry.register_default(keys::CONSOLE_TIMESTAMP_OUTPUT, SettingValue::Boolean(true));

    // Keybinding settings
    registry.register_default(keys::KEYS_FOCUS, string_list(&["F1", "Grave"]));
    registry.register_default(keys::KEYS_QUIT_FOCUS, string_list(&["Escape"]));
    registry.register_default(keys::KEYS_MOVE_UP, string_list(&["Up"]));
    registry.register_default(keys::KEYS_MOVE_DOWN, string_list(&["Down"]));

    registry
}

fn string_list(items: &[&str]) -> SettingValue {
    SettingValue::StringList(items.iter().map(|item| item.to_string()).collect())
}
