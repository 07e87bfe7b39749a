//! Dataset Module
//!
//! Structured results handed back by the market-data source: either a table
//! of records or a single ordered mapping of fields.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// One row of a tabular result; column order is preserved.
pub type Record = serde_json::Map<String, Value>;

// == Field ==
/// One key/value pair of an info-style result.
///
/// Serializes as a single-entry object, the same shape it has inside the
/// mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("expected a JSON array of objects or a JSON object, found {0}")]
    UnsupportedShape(&'static str),

    #[error("row {0} is not a JSON object")]
    NonObjectRow(usize),
}

// == Dataset ==
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    /// Ordered sequence of homogeneous records
    Table(Vec<Record>),
    /// Single keyed mapping; each field is one pageable item
    Mapping(Vec<Field>),
}

impl Dataset {
    pub fn empty_table() -> Self {
        Dataset::Table(Vec::new())
    }

    /// Number of pageable items.
    pub fn len(&self) -> usize {
        match self {
            Dataset::Table(rows) => rows.len(),
            Dataset::Mapping(fields) => fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names of a table in first-seen order; field keys for a mapping.
    pub fn columns(&self) -> Vec<String> {
        match self {
            Dataset::Table(rows) => {
                let mut columns: Vec<String> = Vec::new();
                for row in rows {
                    for name in row.keys() {
                        if !columns.iter().any(|c| c == name) {
                            columns.push(name.clone());
                        }
                    }
                }
                columns
            }
            Dataset::Mapping(fields) => fields.iter().map(|f| f.key.clone()).collect(),
        }
    }

    // == JSON Conversion ==
    /// Table becomes an array of objects, mapping becomes one object.
    pub fn to_json(&self) -> Value {
        match self {
            Dataset::Table(rows) => {
                Value::Array(rows.iter().cloned().map(Value::Object).collect())
            }
            Dataset::Mapping(fields) => Value::Object(
                fields
                    .iter()
                    .map(|f| (f.key.clone(), f.value.clone()))
                    .collect(),
            ),
        }
    }

    pub fn from_json(value: Value) -> Result<Self, DatasetError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(record) => Ok(record),
                    _ => Err(DatasetError::NonObjectRow(index)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Dataset::Table),
            Value::Object(map) => Ok(Dataset::Mapping(
                map.into_iter()
                    .map(|(key, value)| Field { key, value })
                    .collect(),
            )),
            Value::Null => Err(DatasetError::UnsupportedShape("null")),
            Value::Bool(_) => Err(DatasetError::UnsupportedShape("a boolean")),
            Value::Number(_) => Err(DatasetError::UnsupportedShape("a number")),
            Value::String(_) => Err(DatasetError::UnsupportedShape("a string")),
        }
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(rows: Vec<Record>) -> Self {
        Dataset::Table(rows)
    }
}

impl From<Vec<Field>> for Dataset {
    fn from(fields: Vec<Field>) -> Self {
        Dataset::Mapping(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_from_json_preserves_column_order() {
        let dataset = Dataset::from_json(json!([
            {"Date": "2024-01-02", "Open": 187.15, "Close": 185.64},
            {"Date": "2024-01-03", "Open": 184.22, "Close": 184.25, "Dividends": 0.0}
        ]))
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.columns(), vec!["Date", "Open", "Close", "Dividends"]);
    }

    #[test]
    fn test_mapping_from_json() {
        let dataset = Dataset::from_json(json!({"symbol": "AAPL", "beta": 1.24})).unwrap();

        assert_eq!(
            dataset,
            Dataset::Mapping(vec![Field::new("symbol", "AAPL"), Field::new("beta", 1.24)])
        );
    }

    #[test]
    fn test_rejects_scalars_and_non_object_rows() {
        assert_eq!(
            Dataset::from_json(json!("text")),
            Err(DatasetError::UnsupportedShape("a string"))
        );
        assert_eq!(
            Dataset::from_json(json!([{"a": 1}, 2])),
            Err(DatasetError::NonObjectRow(1))
        );
    }

    #[test]
    fn test_to_json_mirrors_from_json() {
        let source = json!({"currentPrice": 190.5, "officers": [{"name": "Tim"}]});
        let dataset = Dataset::from_json(source.clone()).unwrap();

        assert_eq!(dataset.to_json(), source);
    }

    #[test]
    fn test_field_serializes_as_single_entry_object() {
        let text = serde_json::to_string(&Field::new("marketCap", 3_000_000_000u64)).unwrap();
        assert_eq!(text, r#"{"marketCap":3000000000}"#);
    }

    #[test]
    fn test_empty_table() {
        let dataset = Dataset::empty_table();
        assert!(dataset.is_empty());
        assert!(dataset.columns().is_empty());
    }
}
