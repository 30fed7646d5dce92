use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// A single database value, used both as a bound query parameter and as a
/// cell in a returned row.
///
/// Keeping one enum for both directions means the CRUD helpers and the row
/// accessors never branch on driver types:
/// ```rust
/// use corral_db::DbValue;
///
/// let params = vec![
///     DbValue::Text("Bessie".into()),
///     DbValue::Float(47.61),
///     DbValue::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value (no time zone, matching `TIMESTAMP` columns)
    Timestamp(NaiveDateTime),
    /// JSON value (`JSON`/`JSONB` columns)
    Json(JsonValue),
    /// NULL value
    Null,
}

impl DbValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let DbValue::Int(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let DbValue::Float(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let DbValue::Text(v) = self { Some(v) } else { None }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let DbValue::Bool(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let DbValue::Timestamp(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let DbValue::Json(v) = self { Some(v) } else { None }
    }
}

impl Serialize for DbValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DbValue::Int(v) => serializer.serialize_i64(*v),
            DbValue::Float(v) => serializer.serialize_f64(*v),
            DbValue::Text(v) => serializer.serialize_str(v),
            DbValue::Bool(v) => serializer.serialize_bool(*v),
            DbValue::Timestamp(v) => v.serialize(serializer),
            DbValue::Json(v) => v.serialize(serializer),
            DbValue::Null => serializer.serialize_none(),
        }
    }
}

impl From<i64> for DbValue {
    fn from(v: i64) -> Self {
        DbValue::Int(v)
    }
}

impl From<i32> for DbValue {
    fn from(v: i32) -> Self {
        DbValue::Int(i64::from(v))
    }
}

impl From<f64> for DbValue {
    fn from(v: f64) -> Self {
        DbValue::Float(v)
    }
}

impl From<bool> for DbValue {
    fn from(v: bool) -> Self {
        DbValue::Bool(v)
    }
}

impl From<&str> for DbValue {
    fn from(v: &str) -> Self {
        DbValue::Text(v.to_string())
    }
}

impl From<String> for DbValue {
    fn from(v: String) -> Self {
        DbValue::Text(v)
    }
}

impl From<NaiveDateTime> for DbValue {
    fn from(v: NaiveDateTime) -> Self {
        DbValue::Timestamp(v)
    }
}

impl From<JsonValue> for DbValue {
    fn from(v: JsonValue) -> Self {
        DbValue::Json(v)
    }
}

impl<T: Into<DbValue>> From<Option<T>> for DbValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(DbValue::Null, Into::into)
    }
}

/// A SQL string and its bound parameters bundled together.
///
/// This is the unit [`crate::executor::execute_transaction`] consumes:
/// ```rust
/// use corral_db::{DbValue, QueryAndParams};
///
/// let stmt = QueryAndParams::new(
///     "INSERT INTO animals (tag, name) VALUES ($1, $2)",
///     vec![DbValue::Text("A-104".into()), DbValue::Text("Clover".into())],
/// );
/// # let _ = stmt;
/// ```
#[derive(Debug, Clone)]
pub struct QueryAndParams {
    /// The SQL statement text
    pub query: String,
    /// The positional parameters bound to the statement
    pub params: Vec<DbValue>,
}

impl QueryAndParams {
    pub fn new(query: impl Into<String>, params: Vec<DbValue>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Statement with an empty parameter list.
    pub fn new_without_params(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Vec::new(),
        }
    }
}
