use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::DbValue;

/// A single row from a query result.
///
/// Column names are shared across all rows of a result set; lookups by name
/// go through a prebuilt name→index map so repeated `get` calls on wide
/// result sets stay cheap.
#[derive(Debug, Clone)]
pub struct DbRow {
    /// The column names for this row (shared across the whole result set)
    pub columns: Arc<Vec<String>>,
    /// The values for this row, in column order
    pub values: Vec<DbValue>,
    column_index: Arc<HashMap<String, usize>>,
}

impl DbRow {
    #[must_use]
    pub fn new(columns: Arc<Vec<String>>, values: Vec<DbValue>) -> Self {
        let column_index = Arc::new(build_column_index(&columns));
        Self {
            columns,
            values,
            column_index,
        }
    }

    fn with_index(
        columns: Arc<Vec<String>>,
        column_index: Arc<HashMap<String, usize>>,
        values: Vec<DbValue>,
    ) -> Self {
        Self {
            columns,
            values,
            column_index,
        }
    }

    /// Get the index of a column by name.
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index.get(column_name).copied()
    }

    /// Get a value by column name, or `None` if the column does not exist.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&DbValue> {
        self.column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by position.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&DbValue> {
        self.values.get(index)
    }
}

// Rows render as JSON objects (column name → value) so the HTTP layer above
// can return them without an intermediate mapping step.
impl Serialize for DbRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn build_column_index(columns: &[String]) -> HashMap<String, usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect()
}

/// The outcome of a single statement.
///
/// For SELECTs (and DML with `RETURNING`), `rows` holds the result and
/// `rows_affected` equals the row count; for plain DML, `rows` is empty and
/// `rows_affected` carries the driver-reported affected count.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the statement
    pub rows: Vec<DbRow>,
    /// Rows returned or affected, depending on the statement kind
    pub rows_affected: u64,
    columns: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a result set with preallocated row capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Row-less result for a DML statement.
    #[must_use]
    pub fn from_rows_affected(rows_affected: u64) -> Self {
        ResultSet {
            rows_affected,
            ..Self::default()
        }
    }

    /// Set the column names shared by every row added afterwards.
    pub fn set_columns(&mut self, columns: Arc<Vec<String>>) {
        self.column_index = Some(Arc::new(build_column_index(&columns)));
        self.columns = Some(columns);
    }

    #[must_use]
    pub fn columns(&self) -> Option<&Arc<Vec<String>>> {
        self.columns.as_ref()
    }

    /// Append a row of values under the column names set via `set_columns`.
    ///
    /// Rows added before any columns are set are dropped; the backends
    /// always set columns first.
    pub fn push_row(&mut self, values: Vec<DbValue>) {
        let (Some(columns), Some(index)) = (&self.columns, &self.column_index) else {
            return;
        };
        self.rows
            .push(DbRow::with_index(columns.clone(), index.clone(), values));
        self.rows_affected += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column_name` in the first row, if any.
    ///
    /// This is the shape `INSERT … RETURNING id` and `SELECT COUNT(*)`
    /// answers come back in.
    #[must_use]
    pub fn first_value(&self, column_name: &str) -> Option<&DbValue> {
        self.rows.first().and_then(|row| row.get(column_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        let mut rs = ResultSet::new();
        rs.set_columns(Arc::new(vec!["id".to_string(), "name".to_string()]));
        rs.push_row(vec![DbValue::Int(7), DbValue::Text("Daisy".into())]);
        rs.push_row(vec![DbValue::Int(8), DbValue::Null]);
        rs
    }

    #[test]
    fn lookup_by_name_and_index() {
        let rs = sample();
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.rows_affected, 2);
        let row = &rs.rows[0];
        assert_eq!(row.get("id"), Some(&DbValue::Int(7)));
        assert_eq!(row.get_by_index(1), Some(&DbValue::Text("Daisy".into())));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn first_value_reads_the_first_row() {
        let rs = sample();
        assert_eq!(rs.first_value("id"), Some(&DbValue::Int(7)));
        assert_eq!(ResultSet::new().first_value("id"), None);
    }

    #[test]
    fn rows_serialize_as_json_objects() {
        let rs = sample();
        let json = serde_json::to_value(&rs.rows[1]).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 8, "name": null }));
    }

    #[test]
    fn push_without_columns_is_dropped() {
        let mut rs = ResultSet::new();
        rs.push_row(vec![DbValue::Int(1)]);
        assert!(rs.is_empty());
        assert_eq!(rs.rows_affected, 0);
    }
}
