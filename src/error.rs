use thiserror::Error;

/// Errors surfaced by the data-access layer.
///
/// Driver and pool errors pass through transparently so callers can still
/// inspect the underlying `tokio_postgres` error codes; everything else is a
/// message variant. `NotInitialized` is deliberately distinct: it marks a
/// caller-contract violation (an operation before [`crate::pool::initialize`]),
/// not a transient database fault.
#[derive(Debug, Error)]
pub enum DbError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Pool(#[from] bb8::RunError<tokio_postgres::Error>),

    #[error("database pool is not initialized; call initialize() before issuing queries")]
    NotInitialized,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("parameter error: {0}")]
    Parameter(String),
}
