//! Generic CRUD operations shared by every entity table.
//!
//! The application's tables follow one convention (`id`, `created_at`,
//! `updated_at`, `deleted_at`), so a handful of generic operations cover
//! animals, health events, pastures and the rest without a mapper per
//! entity. Each operation builds a parameterized statement in [`sql`] and
//! hands it to [`crate::executor`].
//!
//! Trust boundary: table and column names are interpolated into the
//! statement text, not parameterized. They must come from application
//! code. Never pass user input as an identifier; only values travel as
//! positional parameters.

pub mod sql;

use serde::Serialize;

use crate::error::DbError;
use crate::executor;
use crate::results::DbRow;
use crate::types::DbValue;

/// Radius applied when a geo search does not name one.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 1.0;

/// Page selection for [`select_paginated`]. Pages are 1-based; page 0 is
/// treated as page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination { page: 1, limit: 10 }
    }
}

/// Knobs for one paginated listing. The defaults read every column of
/// live and deleted rows alike; exclude soft-deleted rows by filtering
/// `deleted_at` to `DbValue::Null`.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Columns for the select list; `None` means `*`.
    pub columns: Option<String>,
    /// Equality filters, ANDed together. `Null` values become `IS NULL`.
    pub filters: Vec<(String, DbValue)>,
    pub pagination: Pagination,
    /// `None` means `created_at DESC`.
    pub order_by: Option<String>,
    /// Optional join clause, interpolated verbatim after the table name.
    pub join: Option<String>,
}

/// Outcome of a paginated listing. Listing degrades gracefully: failures
/// come back as `success: false` with an empty page instead of an error,
/// so a UI can render an empty state.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult {
    pub data: Vec<DbRow>,
    pub count: i64,
    pub page: u32,
    pub per_page: u32,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Insert one row and return its generated id. Columns land in the
/// statement in the order given. Returns `0` when the backend yields no
/// id (the mock backend always does).
///
/// # Errors
/// Returns `DbError::Parameter` for an empty column list, or the
/// statement's own error.
pub async fn insert_record(table: &str, values: &[(&str, DbValue)]) -> Result<i64, DbError> {
    let qp = sql::insert_returning_id(table, values)?;
    let result = executor::execute_query_and_params(&qp).await?;
    Ok(result
        .first_value("id")
        .and_then(DbValue::as_int)
        .unwrap_or(0))
}

/// Update every row matching the ANDed equality conditions, stamping
/// `updated_at`. Returns the affected-row count; `0` means nothing
/// matched.
///
/// # Errors
/// Returns `DbError::Parameter` when `updates` or `conditions` is empty,
/// or the statement's own error.
pub async fn update_records(
    table: &str,
    updates: &[(&str, DbValue)],
    conditions: &[(&str, DbValue)],
) -> Result<u64, DbError> {
    let qp = sql::update_by_conditions(table, updates, conditions)?;
    let result = executor::execute_query_and_params(&qp).await?;
    Ok(result.rows_affected)
}

/// One page of rows plus the total count under the same filters. The data
/// and count statements run concurrently on separate pooled connections.
/// Never fails; see [`PagedResult`].
pub async fn select_paginated(table: &str, options: &QueryOptions) -> PagedResult {
    let page = options.pagination.page;
    let per_page = options.pagination.limit;
    let (data_query, count_query) = sql::paginated_select(table, options);

    let (data_result, count_result) = tokio::join!(
        executor::execute_query_and_params(&data_query),
        executor::execute_query_and_params(&count_query),
    );

    match (data_result, count_result) {
        (Ok(data), Ok(count)) => PagedResult {
            count: count
                .first_value("count")
                .and_then(DbValue::as_int)
                .unwrap_or(0),
            data: data.rows,
            page,
            per_page,
            success: true,
            message: None,
        },
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(table, error = %e, "paginated select failed");
            PagedResult {
                data: Vec::new(),
                count: 0,
                page,
                per_page,
                success: false,
                message: Some(e.to_string()),
            }
        }
    }
}

/// Stamp a live row's `deleted_at`. `true` when a row was marked;
/// `false` for a missing or already-deleted id, and for execution
/// failures, which are logged rather than propagated.
pub async fn soft_delete(table: &str, id: i64) -> bool {
    match executor::execute_query_and_params(&sql::soft_delete(table, id)).await {
        Ok(result) => result.rows_affected > 0,
        Err(e) => {
            tracing::warn!(table, id, error = %e, "soft delete failed");
            false
        }
    }
}

/// Live rows within `radius_km` (default 1 km) of a point, closest first,
/// each carrying a computed `distance_km` column. The table must have
/// `latitude`/`longitude` columns and the `earthdistance` extension must
/// be installed.
///
/// # Errors
/// Returns the statement's own error; unlike listing, a failed geo search
/// is a hard failure.
pub async fn search_within_radius(
    table: &str,
    latitude: f64,
    longitude: f64,
    radius_km: Option<f64>,
) -> Result<Vec<DbRow>, DbError> {
    let qp = sql::radius_search(
        table,
        latitude,
        longitude,
        radius_km.unwrap_or(DEFAULT_SEARCH_RADIUS_KM),
    );
    let result = executor::execute_query_and_params(&qp).await?;
    Ok(result.rows)
}

/// Whether a table exists in the public schema. Failures are logged and
/// reported as `false`.
pub async fn table_exists(table: &str) -> bool {
    match executor::execute_query_and_params(&sql::table_exists(table)).await {
        Ok(result) => result
            .first_value("present")
            .and_then(DbValue::as_bool)
            .unwrap_or(false),
        Err(e) => {
            tracing::warn!(table, error = %e, "table existence check failed");
            false
        }
    }
}
