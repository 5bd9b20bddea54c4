//! Conversion from settings into console configuration

use crate::{keys, SettingKey, SettingValue, SettingsError, SettingsRegistry};
use console_core::ConsoleConfig;

/// Builds the console configuration from the effective settings
///
/// Missing keys keep the built-in default. A key holding the wrong value type
/// is an error; counts below 1 are clamped to 1.
pub fn console_config(registry: &SettingsRegistry) -> Result<ConsoleConfig, SettingsError> {
    let defaults = ConsoleConfig::default();

    let config = ConsoleConfig {
        history_capacity: count(registry, keys::CONSOLE_HISTORY_CAPACITY)?
            .unwrap_or(defaults.history_capacity),
        max_alternatives: count(registry, keys::CONSOLE_MAX_ALTERNATIVES)?
            .unwrap_or(defaults.max_alternatives),
        record_failed_commands: flag(registry, keys::CONSOLE_RECORD_FAILED_COMMANDS)?
            .unwrap_or(defaults.record_failed_commands),
        output_capacity: count(registry, keys::CONSOLE_OUTPUT_CAPACITY)?
            .unwrap_or(defaults.output_capacity),
        timestamp_output: flag(registry, keys::CONSOLE_TIMESTAMP_OUTPUT)?
            .unwrap_or(defaults.timestamp_output),
    };

    Ok(config.clamped())
}

/// Key names bound to a console action, e.g. `["F1", "Grave"]`
pub fn key_names(registry: &SettingsRegistry, key: &str) -> Result<Vec<String>, SettingsError> {
    match lookup(registry, key) {
        None => Ok(Vec::new()),
        Some(SettingValue::StringList(names)) => Ok(names.clone()),
        // A single key name is accepted as a one-element list
        Some(SettingValue::String(name)) => Ok(vec![name.clone()]),
        Some(other) => Err(mismatch(key, "string list", other)),
    }
}

fn count(registry: &SettingsRegistry, key: &str) -> Result<Option<usize>, SettingsError> {
    match lookup(registry, key) {
        None => Ok(None),
        Some(SettingValue::Integer(value)) => {
            Ok(Some(usize::try_from((*value).max(1)).unwrap_or(usize::MAX)))
        }
        Some(other) => Err(mismatch(key, "integer", other)),
    }
}

fn flag(registry: &SettingsRegistry, key: &str) -> Result<Option<bool>, SettingsError> {
    match lookup(registry, key) {
        None => Ok(None),
        Some(SettingValue::Boolean(value)) => Ok(Some(*value)),
        Some(other) => Err(mismatch(key, "boolean", other)),
    }
}

fn lookup<'a>(registry: &'a SettingsRegistry, key: &str) -> Option<&'a SettingValue> {
    registry.get(&SettingKey::new(key))
}

fn mismatch(key: &str, expected: &'static str, found: &SettingValue) -> SettingsError {
    SettingsError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_default_registry;

    #[test]
    fn test_defaults_match_console_defaults() {
        let registry = create_default_registry();
        assert_eq!(console_config(&registry).unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn test_empty_registry_uses_builtin_defaults() {
        let registry = SettingsRegistry::new();
        assert_eq!(console_config(&registry).unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn test_overrides_apply() {
        let mut registry = create_default_registry();
        registry.set_override(keys::CONSOLE_HISTORY_CAPACITY, SettingValue::Integer(2));
        registry.set_override(keys::CONSOLE_RECORD_FAILED_COMMANDS, SettingValue::Boolean(false));
        registry.set_override(keys::CONSOLE_TIMESTAMP_OUTPUT, SettingValue::Boolean(false));

        let config = console_config(&registry).unwrap();
        assert_eq!(config.history_capacity, 2);
        assert!(!config.record_failed_commands);
        assert!(!config.timestamp_output);
        assert_eq!(config.max_alternatives, 8);
    }

    #[test]
    fn test_non_positive_counts_clamp_to_one() {
        let mut registry = create_default_registry();
        registry.set_override(keys::CONSOLE_MAX_ALTERNATIVES, SettingValue::Integer(0));
        registry.set_override(keys::CONSOLE_OUTPUT_CAPACITY, SettingValue::Integer(-5));

        let config = console_config(&registry).unwrap();
        assert_eq!(config.max_alternatives, 1);
        assert_eq!(config.output_capacity, 1);
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let mut registry = create_default_registry();
        registry.set_override(
            keys::CONSOLE_HISTORY_CAPACITY,
            SettingValue::String("lots".to_string()),
        );

        assert_eq!(
            console_config(&registry),
            Err(SettingsError::TypeMismatch {
                key: keys::CONSOLE_HISTORY_CAPACITY.to_string(),
                expected: "integer",
                found: "string",
            })
        );
    }

    #[test]
    fn test_key_names() {
        let mut registry = create_default_registry();
        assert_eq!(
            key_names(&registry, keys::KEYS_FOCUS).unwrap(),
            vec!["F1".to_string(), "Grave".to_string()]
        );

        registry.set_override(keys::KEYS_FOCUS, SettingValue::String("F2".to_string()));
        assert_eq!(key_names(&registry, keys::KEYS_FOCUS).unwrap(), vec!["F2".to_string()]);

        registry.set_override(keys::KEYS_MOVE_UP, SettingValue::Boolean(true));
        assert!(key_names(&registry, keys::KEYS_MOVE_UP).is_err());

        assert!(key_names(&SettingsRegistry::new(), keys::KEYS_MOVE_UP)
            .unwrap()
            .is_empty());
    }
}
