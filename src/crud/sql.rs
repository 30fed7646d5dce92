//! Pure statement builders: each function turns structured input into a
//! statement text plus positional parameters, with no I/O. Kept separate
//! from execution so the generated SQL is unit-testable.

use crate::error::DbError;
use crate::types::{DbValue, QueryAndParams};

use super::QueryOptions;

/// Append `col = $n` clauses for each condition, pushing values onto
/// `params` as we go. A `Null` condition value renders as `col IS NULL`
/// and consumes no placeholder, which is how callers express filters such
/// as "not soft-deleted".
fn push_conditions<K: AsRef<str>>(
    conditions: &[(K, DbValue)],
    params: &mut Vec<DbValue>,
    clauses: &mut Vec<String>,
) {
    for (column, value) in conditions {
        if value.is_null() {
            clauses.push(format!("{} IS NULL", column.as_ref()));
        } else {
            params.push(value.clone());
            clauses.push(format!("{} = ${}", column.as_ref(), params.len()));
        }
    }
}

/// `INSERT INTO table (cols) VALUES ($1, ...) RETURNING id`, with one
/// placeholder per column in the given order.
///
/// # Errors
/// Returns `DbError::Parameter` when `values` is empty.
pub fn insert_returning_id(
    table: &str,
    values: &[(&str, DbValue)],
) -> Result<QueryAndParams, DbError> {
    if values.is_empty() {
        return Err(DbError::Parameter(format!(
            "insert into {table} requires at least one column"
        )));
    }

    let columns: Vec<&str> = values.iter().map(|(column, _)| *column).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("${i}")).collect();
    let params: Vec<DbValue> = values.iter().map(|(_, value)| value.clone()).collect();

    Ok(QueryAndParams::new(
        format!(
            "INSERT INTO {table} ({}) VALUES ({}) RETURNING id",
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    ))
}

/// `UPDATE table SET col = $n, ..., updated_at = CURRENT_TIMESTAMP WHERE
/// cond = $m AND ...`. Parameters are the update values followed by the
/// condition values, in that order.
///
/// # Errors
/// Returns `DbError::Parameter` when `updates` or `conditions` is empty;
/// an unconditional UPDATE is never built.
pub fn update_by_conditions(
    table: &str,
    updates: &[(&str, DbValue)],
    conditions: &[(&str, DbValue)],
) -> Result<QueryAndParams, DbError> {
    if updates.is_empty() {
        return Err(DbError::Parameter(format!(
            "update of {table} requires at least one column"
        )));
    }
    if conditions.is_empty() {
        return Err(DbError::Parameter(format!(
            "update of {table} requires at least one condition"
        )));
    }

    let mut params = Vec::with_capacity(updates.len() + conditions.len());
    let mut set_clauses = Vec::with_capacity(updates.len() + 1);
    for (column, value) in updates {
        params.push(value.clone());
        set_clauses.push(format!("{column} = ${}", params.len()));
    }
    set_clauses.push("updated_at = CURRENT_TIMESTAMP".to_string());

    let mut where_clauses = Vec::with_capacity(conditions.len());
    push_conditions(conditions, &mut params, &mut where_clauses);

    Ok(QueryAndParams::new(
        format!(
            "UPDATE {table} SET {} WHERE {}",
            set_clauses.join(", "),
            where_clauses.join(" AND ")
        ),
        params,
    ))
}

/// Build the data and count statements for one paginated listing. Both
/// share the same join and WHERE clause; only the data statement carries
/// ORDER BY, LIMIT and OFFSET. Returned as `(data, count)`.
#[must_use]
pub fn paginated_select(table: &str, options: &QueryOptions) -> (QueryAndParams, QueryAndParams) {
    let columns = options.columns.as_deref().unwrap_or("*");
    let order_by = options.order_by.as_deref().unwrap_or("created_at DESC");
    let join = options
        .join
        .as_deref()
        .map(|clause| format!(" {clause}"))
        .unwrap_or_default();

    let mut params = Vec::new();
    let mut where_clauses = Vec::new();
    push_conditions(&options.filters, &mut params, &mut where_clauses);
    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_clauses.join(" AND "))
    };

    let count = QueryAndParams::new(
        format!("SELECT COUNT(*) FROM {table}{join}{where_sql}"),
        params.clone(),
    );

    let limit = i64::from(options.pagination.limit);
    let offset = i64::from(options.pagination.page.saturating_sub(1)) * limit;
    let mut data_params = params;
    data_params.push(DbValue::Int(limit));
    data_params.push(DbValue::Int(offset));
    let data = QueryAndParams::new(
        format!(
            "SELECT {columns} FROM {table}{join}{where_sql} ORDER BY {order_by} LIMIT ${} OFFSET ${}",
            data_params.len() - 1,
            data_params.len()
        ),
        data_params,
    );

    (data, count)
}

/// Mark one live row deleted by stamping `deleted_at`. Rows already
/// soft-deleted do not match, so the affected count distinguishes a real
/// delete from a repeat.
#[must_use]
pub fn soft_delete(table: &str, id: i64) -> QueryAndParams {
    QueryAndParams::new(
        format!(
            "UPDATE {table} SET deleted_at = CURRENT_TIMESTAMP, \
             updated_at = CURRENT_TIMESTAMP WHERE id = $1 AND deleted_at IS NULL"
        ),
        vec![DbValue::Int(id)],
    )
}

/// Distance query over the earthdistance extension: every live row within
/// `radius_km` of the given point, closest first, with the computed
/// distance exposed as `distance_km`. The row's own coordinates are read
/// from `latitude`/`longitude` columns.
#[must_use]
pub fn radius_search(
    table: &str,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> QueryAndParams {
    QueryAndParams::new(
        format!(
            "SELECT *, earth_distance(ll_to_earth($1, $2), \
             ll_to_earth(latitude, longitude)) / 1000.0 AS distance_km \
             FROM {table} \
             WHERE earth_distance(ll_to_earth($1, $2), \
             ll_to_earth(latitude, longitude)) / 1000.0 <= $3 \
             AND deleted_at IS NULL \
             ORDER BY distance_km ASC"
        ),
        vec![
            DbValue::Float(latitude),
            DbValue::Float(longitude),
            DbValue::Float(radius_km),
        ],
    )
}

/// Schema-catalog probe for a table in the public schema.
#[must_use]
pub fn table_exists(table: &str) -> QueryAndParams {
    QueryAndParams::new(
        "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
         WHERE table_schema = 'public' AND table_name = $1) AS present",
        vec![DbValue::Text(table.to_string())],
    )
}
