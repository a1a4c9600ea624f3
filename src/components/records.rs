//! Plain data records the card factory renders. Every field is optional so
//! page data with gaps still parses; whether a gap is an error is decided by
//! [`super::Strictness`].
//!
//! Page data arriving from JavaScript is converted leniently: a field of the
//! wrong type is treated as absent rather than rejecting the whole list.

use crate::errors::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PolicyRecord {
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl PolicyRecord {
    pub fn new(number: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            number: Some(number),
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    /// First absent field, in render order.
    pub(crate) fn missing_field(&self) -> Option<&'static str> {
        if self.number.is_none() {
            Some("number")
        } else if self.title.is_none() {
            Some("title")
        } else if self.content.is_none() {
            Some("content")
        } else {
            None
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct FeatureRecord {
    #[serde(default)]
    pub icon: Option<String>, // usually a single emoji
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl FeatureRecord {
    pub fn new(
        icon: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            icon: Some(icon.into()),
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    pub(crate) fn missing_field(&self) -> Option<&'static str> {
        if self.icon.is_none() {
            Some("icon")
        } else if self.title.is_none() {
            Some("title")
        } else if self.content.is_none() {
            Some("content")
        } else {
            None
        }
    }
}

/// A record that can be built from arbitrary JSON without failing.
pub trait LenientRecord: Default {
    fn from_fields(fields: &Map<String, Value>) -> Self;
}

impl LenientRecord for PolicyRecord {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            number: fields.get("number").and_then(integer_field),
            title: fields.get("title").and_then(text_field),
            content: fields.get("content").and_then(text_field),
        }
    }
}

impl LenientRecord for FeatureRecord {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            icon: fields.get("icon").and_then(text_field),
            title: fields.get("title").and_then(text_field),
            content: fields.get("content").and_then(text_field),
        }
    }
}

/// Converts a JSON array into records. Entries that are not objects become
/// empty records; anything other than an array yields no records.
pub fn records_from_value<T: LenientRecord>(value: &Value) -> Vec<T> {
    let Some(entries) = value.as_array() else {
        tracing::warn!("card records are not a list, rendering none");
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| entry.as_object().map(T::from_fields).unwrap_or_default())
        .collect()
}

/// Parses `json` and converts it with [`records_from_value`].
///
/// # Errors
///
/// Returns [`Error::Records`] only if `json` is not valid JSON text.
pub fn records_from_json<T: LenientRecord>(json: &str) -> Result<Vec<T>, Error> {
    let value: Value = serde_json::from_str(json)?;
    Ok(records_from_value(&value))
}

// Strings pass through; numbers and booleans are shown the way JavaScript
// would print them.
fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(match (number.as_i64(), number.as_u64(), number.as_f64()) {
            (Some(n), _, _) => n.to_string(),
            (None, Some(n), _) => n.to_string(),
            (None, None, Some(n)) if n.fract() == 0.0 && n.abs() < 1e21 => format!("{n:.0}"),
            _ => number.to_string(),
        }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integer_field(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|n| n.fract() == 0.0 && n.abs() < 9.0e15)
                .map(|n| n as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{records_from_json, records_from_value, FeatureRecord, PolicyRecord};
    use serde_json::json;

    #[test]
    fn policy_records_parse_with_missing_fields() {
        let records: Vec<PolicyRecord> =
            serde_json::from_str(r#"[{"number": 1, "title": "Refunds"}, {}]"#)
                .expect("valid json");

        assert_eq!(records[0].number, Some(1));
        assert_eq!(records[0].missing_field(), Some("content"));
        assert_eq!(records[1], PolicyRecord::default());
        assert_eq!(records[1].missing_field(), Some("number"));
    }

    #[test]
    fn complete_feature_record_has_no_missing_field() {
        let record = FeatureRecord::new("🎧", "Studio quality", "Lossless audio.");
        assert_eq!(record.missing_field(), None);
    }

    #[test]
    fn wrong_typed_policy_fields_degrade_instead_of_failing() {
        let records: Vec<PolicyRecord> = records_from_value(&json!([
            {"number": "3", "title": 42, "content": true},
            {"number": 1.5, "title": null, "content": ["a"]},
            {"number": 2.0, "title": {"b": 1}},
            "not an object",
        ]));

        assert_eq!(records.len(), 4);
        assert_eq!(records[0], PolicyRecord::new(3, "42", "true"));
        assert_eq!(records[1], PolicyRecord::default());
        assert_eq!(records[2].number, Some(2));
        assert_eq!(records[2].title, None);
        assert_eq!(records[3], PolicyRecord::default());
    }

    #[test]
    fn wrong_typed_feature_fields_degrade_instead_of_failing() {
        let records: Vec<FeatureRecord> =
            records_from_json(r#"[{"icon": 7, "title": "Mixing", "content": 0.5}]"#)
                .expect("valid json text");

        assert_eq!(records, vec![FeatureRecord::new("7", "Mixing", "0.5")]);
    }

    #[test]
    fn non_list_input_yields_no_records() {
        let records: Vec<PolicyRecord> = records_from_value(&json!({"number": 1}));
        assert!(records.is_empty());
        assert!(records_from_json::<FeatureRecord>("not json").is_err());
    }
}
