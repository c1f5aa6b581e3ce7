//! Per-probe readings with normalised field names

use std::collections::HashMap;

use serde_json::Value;

use crate::driver::RawReading;

/// One probe's snapshot for a single poll cycle
///
/// Field names are normalised (spaces become underscores, then lower-cased)
/// and values are kept as optional strings. A `None` value means the probe
/// exposed the field without a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reading {
    fields: HashMap<String, Option<String>>,
}

impl Reading {
    /// Build a reading from a driver's raw key/value snapshot
    pub fn from_raw(raw: RawReading) -> Self {
        let fields = raw
            .into_iter()
            .map(|(key, value)| (Self::normalize_key(&key), Self::normalize_value(value)))
            .collect();

        Self { fields }
    }

    /// Normalise a field name: `"Internal Temperature"` -> `internal_temperature`
    pub fn normalize_key(key: &str) -> String {
        key.replace(' ', "_").to_lowercase()
    }

    fn normalize_value(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Whether the probe exposes `field` at all
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Value of `field`, or `None` when missing or empty
    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    /// Insert a field, normalising its name
    pub fn with_field(mut self, key: &str, value: Option<&str>) -> Self {
        self.fields
            .insert(Self::normalize_key(key), value.map(str::to_string));
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawReading {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_keys_are_normalized() {
        let reading = Reading::from_raw(raw(json!({
            "Internal Temperature": "21.5",
            "Internal Humidity": "40",
            "Firmware": "TEMPerX_V3.3",
        })));

        assert!(reading.has("internal_temperature"));
        assert!(reading.has("internal_humidity"));
        assert!(reading.has("firmware"));
        assert_eq!(reading.value("internal_temperature"), Some("21.5"));
    }

    #[test]
    fn test_null_and_empty_values_are_absent() {
        let reading = Reading::from_raw(raw(json!({
            "internal temperature": null,
            "internal humidity": "",
        })));

        assert!(reading.has("internal_temperature"));
        assert_eq!(reading.value("internal_temperature"), None);
        assert!(reading.has("internal_humidity"));
        assert_eq!(reading.value("internal_humidity"), None);
    }

    #[test]
    fn test_numbers_keep_json_text() {
        let reading = Reading::from_raw(raw(json!({"internal temperature": 22.25})));
        assert_eq!(reading.value("internal_temperature"), Some("22.25"));
    }

    #[test]
    fn test_with_field_normalizes() {
        let reading = Reading::default().with_field("Internal Humidity", Some("55"));
        assert_eq!(reading.value("internal_humidity"), Some("55"));
        assert_eq!(reading.len(), 1);
    }
}
