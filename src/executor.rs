//! Query execution against the process-wide pool.
//!
//! Every entry point here checks a connection out, runs the work, and
//! releases the connection by dropping it, so a failed statement can never
//! leak a pool slot. Timing is recorded around the statement itself, not
//! around pool checkout.

use std::time::Instant;

use crate::error::DbError;
use crate::pool;
use crate::results::ResultSet;
use crate::types::{DbValue, QueryAndParams};

/// Run one statement on the process-wide pool and return its results.
///
/// # Errors
/// Returns `DbError::NotInitialized` before [`pool::initialize`] has run,
/// checkout errors from the pool, or the statement's own error.
pub async fn execute_query(query: &str, params: &[DbValue]) -> Result<ResultSet, DbError> {
    let pool = pool::require_pool()?;
    let conn = pool.acquire().await?;

    let started = Instant::now();
    let outcome = conn.run_statement(query, params).await;
    match &outcome {
        Ok(result_set) => {
            tracing::debug!(
                query,
                elapsed = ?started.elapsed(),
                rows = result_set.len(),
                rows_affected = result_set.rows_affected,
                "query completed"
            );
        }
        Err(e) => {
            tracing::error!(
                query,
                elapsed = ?started.elapsed(),
                error = %e,
                "query failed"
            );
        }
    }
    outcome
}

/// [`execute_query`] for a bundled query-and-parameters pair.
///
/// # Errors
/// Same as [`execute_query`].
pub async fn execute_query_and_params(qp: &QueryAndParams) -> Result<ResultSet, DbError> {
    execute_query(&qp.query, &qp.params).await
}

/// Run a batch of statements as a single transaction on one pooled
/// connection. All statements commit together; the first failure rolls the
/// batch back and its error is returned. An empty batch commits trivially.
///
/// # Errors
/// Returns `DbError::NotInitialized` before [`pool::initialize`] has run,
/// checkout errors, or the first failing statement's error.
pub async fn execute_transaction(
    queries: &[QueryAndParams],
) -> Result<Vec<ResultSet>, DbError> {
    let pool = pool::require_pool()?;
    let mut conn = pool.acquire().await?;

    let started = Instant::now();
    let outcome = conn.run_transaction(queries).await;
    match &outcome {
        Ok(_) => {
            tracing::debug!(
                statements = queries.len(),
                elapsed = ?started.elapsed(),
                "transaction committed"
            );
        }
        Err(e) => {
            tracing::error!(
                statements = queries.len(),
                elapsed = ?started.elapsed(),
                error = %e,
                "transaction rolled back"
            );
        }
    }
    outcome
}
