use tokio_postgres::Client;

use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::QueryAndParams;

use super::query::run_statement;

/// Run a batch of statements inside one transaction. Statements execute in
/// order; the first failure rolls the whole batch back and that statement's
/// error is returned. On success the per-statement result sets come back in
/// submission order.
///
/// # Errors
/// Returns the failing statement's error, or the commit/begin error.
pub async fn run_transaction(
    client: &mut Client,
    queries: &[QueryAndParams],
) -> Result<Vec<ResultSet>, DbError> {
    let tx = client.transaction().await?;

    let mut results = Vec::with_capacity(queries.len());
    for q in queries {
        match run_statement(&tx, &q.query, &q.params).await {
            Ok(result_set) => results.push(result_set),
            Err(e) => {
                // The statement error is the one the caller needs; a
                // rollback failure on top of it only gets logged.
                if let Err(rb) = tx.rollback().await {
                    tracing::warn!(error = %rb, "transaction rollback failed");
                }
                return Err(e);
            }
        }
    }

    tx.commit().await?;
    Ok(results)
}
