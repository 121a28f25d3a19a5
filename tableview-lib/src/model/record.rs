//! Row records and their identifiers.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;

/// Opaque identifier of a row, as issued by the server.
///
/// The list endpoint may send ids as JSON strings or numbers; both are kept
/// in their textual form and sent back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates an id from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// One row of a list response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RowRecord {
    /// Row identifier used by edit and delete.
    pub id: RecordId,
    /// Column values keyed by column name.
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

impl RowRecord {
    /// Creates a row with no data.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            data: BTreeMap::new(),
        }
    }

    /// Adds a column value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(column.into(), value.into());
        self
    }

    /// Returns the raw value of a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.data.get(column)
    }

    /// Returns the display text of a column.
    ///
    /// Strings are shown without quotes, `null` and missing columns as an
    /// empty string, everything else in its JSON form.
    pub fn display(&self, column: &str) -> String {
        match self.data.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_from_string_or_number() {
        let row: RowRecord = serde_json::from_value(json!({"id": "a-1", "data": {}})).unwrap();
        assert_eq!(row.id.as_str(), "a-1");

        let row: RowRecord = serde_json::from_value(json!({"id": 42, "data": {}})).unwrap();
        assert_eq!(row.id, RecordId::from(42));
    }

    #[test]
    fn test_display_values() {
        let row = RowRecord::new("1")
            .with("name", "Ada")
            .with("age", 36)
            .with("admin", true)
            .with("note", Value::Null);

        assert_eq!(row.display("name"), "Ada");
        assert_eq!(row.display("age"), "36");
        assert_eq!(row.display("admin"), "true");
        assert_eq!(row.display("note"), "");
        assert_eq!(row.display("missing"), "");
    }

    #[test]
    fn test_missing_data_defaults_to_empty() {
        let row: RowRecord = serde_json::from_value(json!({"id": 7})).unwrap();
        assert!(row.data.is_empty());
    }
}
