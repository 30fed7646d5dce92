use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use tokio_postgres::{GenericClient, Statement};

use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::DbValue;

use super::params::Params;

/// Prepare and run one statement, routing on its shape: statements that
/// produce columns (SELECT, or DML with RETURNING) are run as queries and
/// yield rows; everything else is run as a command and yields the affected
/// row count. Works on a plain client or inside a transaction.
///
/// # Errors
/// Returns errors from preparation or execution.
pub async fn run_statement<C>(
    db: &C,
    query: &str,
    params: &[DbValue],
) -> Result<ResultSet, DbError>
where
    C: GenericClient,
{
    let stmt = db.prepare(query).await?;
    let converted = Params::convert(params);

    if stmt.columns().is_empty() {
        let affected = db.execute(&stmt, converted.as_refs()).await?;
        Ok(ResultSet::from_rows_affected(affected))
    } else {
        let rows = db.query(&stmt, converted.as_refs()).await?;
        build_result_set(&stmt, &rows)
    }
}

/// Build a result set using statement metadata for column names.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set(
    stmt: &Statement,
    rows: &[tokio_postgres::Row],
) -> Result<ResultSet, DbError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_columns(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(extract_value(row, idx)?);
        }
        result_set.push_row(row_values);
    }

    Ok(result_set)
}

/// Extracts a `DbValue` from a `tokio_postgres` Row at the given index.
///
/// # Errors
/// Returns `DbError` if the column cannot be retrieved.
pub fn extract_value(row: &tokio_postgres::Row, idx: usize) -> Result<DbValue, DbError> {
    // Determine the type of the column and extract accordingly
    let type_info = row.columns()[idx].type_();

    if type_info.name() == "int2" {
        let val: Option<i16> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, |v| DbValue::Int(i64::from(v))))
    } else if type_info.name() == "int4" {
        let val: Option<i32> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, |v| DbValue::Int(i64::from(v))))
    } else if type_info.name() == "int8" {
        let val: Option<i64> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, DbValue::Int))
    } else if type_info.name() == "float4" {
        // f64 only decodes float8; REAL columns come out as f32.
        let val: Option<f32> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, |v| DbValue::Float(f64::from(v))))
    } else if type_info.name() == "float8" {
        let val: Option<f64> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, DbValue::Float))
    } else if type_info.name() == "bool" {
        let val: Option<bool> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, DbValue::Bool))
    } else if type_info.name() == "timestamp" {
        let val: Option<NaiveDateTime> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, DbValue::Timestamp))
    } else if type_info.name() == "timestamptz" {
        // NaiveDateTime only decodes timestamp; TIMESTAMPTZ (NOW()
        // included) must come through a zone-aware type, stored as UTC.
        let val: Option<DateTime<Utc>> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, |v| DbValue::Timestamp(v.naive_utc())))
    } else if type_info.name() == "date" {
        let val: Option<NaiveDate> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, |d| {
            DbValue::Timestamp(d.and_time(NaiveTime::MIN))
        }))
    } else if type_info.name() == "json" || type_info.name() == "jsonb" {
        let val: Option<Value> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, DbValue::Json))
    } else {
        // For other types, attempt to get as string
        let val: Option<String> = row.try_get(idx)?;
        Ok(val.map_or(DbValue::Null, DbValue::Text))
    }
}
