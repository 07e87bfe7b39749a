//! Field Projection
//!
//! Narrows a result to a caller-chosen set of fields. Runs on a read-only
//! view of the cached result, independent of pagination.

use serde_json::Value;

use crate::dataset::{Dataset, Field, Record};

/// Placeholder for a requested field the result does not carry.
pub const MISSING_FIELD: &str = "N/A";

/// Keeps only `fields`, in the order given.
///
/// A mapping keeps the named keys; a table keeps the named columns of every
/// row. Fields absent from the source are filled with [`MISSING_FIELD`].
pub fn project(dataset: &Dataset, fields: &[String]) -> Dataset {
    match dataset {
        Dataset::Mapping(source) => Dataset::Mapping(
            fields
                .iter()
                .map(|name| {
                    let value = source
                        .iter()
                        .find(|field| &field.key == name)
                        .map(|field| field.value.clone())
                        .unwrap_or_else(missing);
                    Field::new(name.clone(), value)
                })
                .collect(),
        ),
        Dataset::Table(rows) => Dataset::Table(
            rows.iter()
                .map(|row| {
                    fields
                        .iter()
                        .map(|name| {
                            let value = row.get(name).cloned().unwrap_or_else(missing);
                            (name.clone(), value)
                        })
                        .collect::<Record>()
                })
                .collect(),
        ),
    }
}

fn missing() -> Value {
    Value::String(MISSING_FIELD.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mapping_projection_fills_missing() {
        let info = Dataset::from_json(json!({
            "symbol": "AAPL",
            "currentPrice": 189.84,
            "beta": 1.24
        }))
        .unwrap();

        let projected = project(&info, &names(&["beta", "dividendYield", "symbol"]));

        assert_eq!(
            projected,
            Dataset::Mapping(vec![
                Field::new("beta", 1.24),
                Field::new("dividendYield", "N/A"),
                Field::new("symbol", "AAPL"),
            ])
        );
    }

    #[test]
    fn test_table_projection_selects_columns() {
        let table = Dataset::from_json(json!([
            {"Date": "2024-01-02", "Open": 187.15, "Close": 185.64, "Volume": 82488700},
            {"Date": "2024-01-03", "Open": 184.22, "Close": 184.25}
        ]))
        .unwrap();

        let projected = project(&table, &names(&["Date", "Volume"]));

        assert_eq!(
            projected.to_json(),
            json!([
                {"Date": "2024-01-02", "Volume": 82488700},
                {"Date": "2024-01-03", "Volume": "N/A"}
            ])
        );
    }

    #[test]
    fn test_projection_leaves_source_untouched() {
        let table = Dataset::from_json(json!([{"a": 1, "b": 2}])).unwrap();
        let before = table.clone();

        let _ = project(&table, &names(&["b"]));

        assert_eq!(table, before);
    }
}
