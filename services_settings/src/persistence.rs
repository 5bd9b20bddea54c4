//! Settings persistence layer
//!
//! Loads settings overrides from versioned JSON.

use crate::{SettingKey, SettingValue, SettingsError, SettingsRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable container for settings overrides
/// Uses BTreeMap for stable ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsOverridesData {
    /// Version of the settings format (for future migrations)
    pub version: u32,
    /// Overrides keyed by setting path
    #[serde(default)]
    pub overrides: BTreeMap<String, SettingValue>,
}

impl SettingsOverridesData {
    /// Current version of the settings format
    pub const CURRENT_VERSION: u32 = 1;

    /// Converts settings data to registry overrides
    pub fn to_overrides(&self) -> BTreeMap<SettingKey, SettingValue> {
        self.overrides
            .iter()
            .map(|(key, value)| (SettingKey::new(key.as_str()), value.clone()))
            .collect()
    }
}

/// Deserializes settings overrides from JSON bytes
pub fn deserialize_overrides(bytes: &[u8]) -> Result<SettingsOverridesData, SettingsError> {
    let data: SettingsOverridesData = serde_json::from_slice(bytes)
        .map_err(|e| SettingsError::DeserializationFailed(e.to_string()))?;

    // Check version compatibility
    if data.version != SettingsOverridesData::CURRENT_VERSION {
        return Err(SettingsError::UnsupportedVersion(data.version));
    }

    Ok(data)
}

/// Merges overrides from JSON bytes into the registry
///
/// An override whose key has a default of a different type is rejected before
/// anything is applied.
pub fn apply_json(registry: &mut SettingsRegistry, bytes: &[u8]) -> Result<usize, SettingsError> {
    let data = deserialize_overrides(bytes)?;
    let overrides = data.to_overrides();

    for (key, value) in &overrides {
        if let Some(default) = registry.get_default(key) {
            if !default.same_type(value) {
                return Err(SettingsError::TypeMismatch {
                    key: key.to_string(),
                    expected: default.type_name(),
                    found: value.type_name(),
                });
            }
        }
    }

    let count = overrides.len();
    registry.apply_overrides(overrides);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_default_registry, keys};

    #[test]
    fn test_deserialize_overrides() {
        let json = r#"{ "version": 1, "overrides": {
            "console.history_capacity": { "Integer": 2 },
            "console.keys.focus": { "StringList": ["F2", "Grave"] }
        } }"#;

        let data = deserialize_overrides(json.as_bytes()).unwrap();
        assert_eq!(data.version, SettingsOverridesData::CURRENT_VERSION);

        let overrides = data.to_overrides();
        assert_eq!(overrides.len(), 2);
        assert_eq!(
            overrides.get(&SettingKey::new(keys::CONSOLE_HISTORY_CAPACITY)),
            Some(&SettingValue::Integer(2))
        );
    }

    #[test]
    fn test_deserialize_invalid_json() {
        let result = deserialize_overrides(b"{ invalid json }");
        assert!(matches!(result, Err(SettingsError::DeserializationFailed(_))));
    }

    #[test]
    fn test_deserialize_unsupported_version() {
        let json = r#"{ "version": 999, "overrides": {} }"#;
        assert_eq!(
            deserialize_overrides(json.as_bytes()),
            Err(SettingsError::UnsupportedVersion(999))
        );
    }

    #[test]
    fn test_missing_overrides_field_is_empty() {
        let data = deserialize_overrides(br#"{ "version": 1 }"#).unwrap();
        assert!(data.overrides.is_empty());
    }

    #[test]
    fn test_unknown_value_type_is_rejected() {
        let json = r#"{ "version": 1, "overrides": {
            "console.history_capacity": { "Float": 2.5 }
        } }"#;
        assert!(matches!(
            deserialize_overrides(json.as_bytes()),
            Err(SettingsError::DeserializationFailed(_))
        ));
    }

    #[test]
    fn test_apply_json_merges() {
        let mut registry = create_default_registry();
        let json = r#"{ "version": 1, "overrides": {
            "console.history_capacity": { "Integer": 2 }
        } }"#;

        assert_eq!(apply_json(&mut registry, json.as_bytes()).unwrap(), 1);
        assert_eq!(
            registry.get(&SettingKey::new(keys::CONSOLE_HISTORY_CAPACITY)),
            Some(&SettingValue::Integer(2))
        );
    }

    #[test]
    fn test_apply_json_rejects_type_change() {
        let mut registry = create_default_registry();
        let json = r#"{ "version": 1, "overrides": {
            "console.history_capacity": { "Integer": 3 },
            "console.timestamp_output": { "Integer": 0 }
        } }"#;

        let err = apply_json(&mut registry, json.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            SettingsError::TypeMismatch {
                key: keys::CONSOLE_TIMESTAMP_OUTPUT.to_string(),
                expected: "boolean",
                found: "integer",
            }
        );
        // Nothing applied
        assert_eq!(registry.override_count(), 0);
    }
}
