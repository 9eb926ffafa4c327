//! Grid snapshot and record types.
//!
//! A [`Grid`] is the full in-memory snapshot of one tab: the header row
//! that defines column order, plus the data rows. Cells are untyped
//! text. A [`Record`] is the unordered name→value payload a caller
//! supplies for add/update/delete; it may carry extra or missing fields
//! relative to any given header.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// An ordered JSON object, used for row output keyed by header name.
pub type JsonMap = Map<String, Value>;

/// Full snapshot of one tab: header row plus data rows.
///
/// Fetched fresh from the backend before every operation and discarded
/// after; nothing caches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Column names, in storage order. Defines the order of every row
    /// written back.
    pub headers: Vec<String>,
    /// Data rows. Each row is positionally aligned with `headers`.
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    /// Creates an empty grid with the given header row.
    #[must_use]
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Returns the position of a column in the header, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Converts one data row into an object keyed by header name, in
    /// header order. Cells missing from a short row read as empty.
    #[must_use]
    pub fn row_object(&self, row: &[String]) -> JsonMap {
        let mut object = JsonMap::new();
        for (i, header) in self.headers.iter().enumerate() {
            let cell = row.get(i).cloned().unwrap_or_default();
            object.insert(header.clone(), Value::String(cell));
        }
        object
    }
}

/// Unordered mapping from column name to scalar text value.
///
/// Built from JSON payloads: string values are kept as-is, numbers and
/// booleans are stringified, nulls and composite values are dropped
/// (an absent field and an explicit null behave identically).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON object payload.
    #[must_use]
    pub fn from_json(object: &JsonMap) -> Self {
        let mut fields = BTreeMap::new();
        for (name, value) in object {
            if let Some(text) = scalar_to_string(value) {
                fields.insert(name.clone(), text);
            }
        }
        Self { fields }
    }

    /// Returns the value of a field, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Returns the field value when it is present and non-empty.
    #[must_use]
    pub fn get_non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_index() {
        let grid = Grid::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(grid.column_index("b"), Some(1));
        assert_eq!(grid.column_index("z"), None);
    }

    #[test]
    fn test_row_object_in_header_order() {
        let mut grid = Grid::new(vec!["auction_name".into(), "address".into()]);
        grid.rows.push(vec!["March Sale".into(), "1 High St".into()]);

        let object = grid.row_object(&grid.rows[0]);
        let keys: Vec<&String> = object.keys().collect();
        assert_eq!(keys, ["auction_name", "address"]);
        assert_eq!(object["address"], json!("1 High St"));
    }

    #[test]
    fn test_row_object_pads_short_rows() {
        let grid = Grid::new(vec!["a".into(), "b".into()]);
        let object = grid.row_object(&["only".to_string()]);
        assert_eq!(object["a"], json!("only"));
        assert_eq!(object["b"], json!(""));
    }

    #[test]
    fn test_record_from_json_stringifies_scalars() {
        let payload = json!({
            "address": "1 High St",
            "lot_number": 42,
            "sold": true,
            "owner": null,
            "nested": {"ignored": 1},
        });
        let record = Record::from_json(payload.as_object().unwrap());

        assert_eq!(record.get("address"), Some("1 High St"));
        assert_eq!(record.get("lot_number"), Some("42"));
        assert_eq!(record.get("sold"), Some("true"));
        assert_eq!(record.get("owner"), None);
        assert_eq!(record.get("nested"), None);
    }

    #[test]
    fn test_get_non_empty() {
        let record = Record::new().with("a", "").with("b", "x");
        assert_eq!(record.get("a"), Some(""));
        assert_eq!(record.get_non_empty("a"), None);
        assert_eq!(record.get_non_empty("b"), Some("x"));
    }
}
