//! Connection pool facade and process-wide lifecycle.
//!
//! A single pool is shared by the whole process. `initialize` builds it
//! (falling back to the mock backend when PostgreSQL cannot be reached,
//! so the application starts either way), `active_pool`/`require_pool`
//! hand it out, and `close` tears it down. Handlers normally go through
//! [`crate::executor`] instead of touching the pool directly.

use std::sync::{PoisonError, RwLock};

use serde::Serialize;

#[cfg(feature = "postgres")]
use bb8::PooledConnection;

use crate::config::{BackendKind, DbConfig};
use crate::error::DbError;
use crate::mock::MockPool;
#[cfg(feature = "postgres")]
use crate::postgres::{self, PgManager, PgPool};
use crate::results::ResultSet;
use crate::types::{DbValue, QueryAndParams};

/// The process-wide pool. Guarded by a std lock; it is only ever held to
/// clone the pool handle out, never across an await point.
static ACTIVE_POOL: RwLock<Option<DbPool>> = RwLock::new(None);

/// A handle to one of the available backends. Cheap to clone; clones share
/// the underlying pool.
#[derive(Clone, Debug)]
pub enum DbPool {
    #[cfg(feature = "postgres")]
    Postgres(PgPool),
    Mock(MockPool),
}

/// A checked-out connection. Dropping it returns the underlying client to
/// the pool, so release happens on every path, panics included.
pub enum DbConnection {
    #[cfg(feature = "postgres")]
    Postgres(PooledConnection<'static, PgManager>),
    Mock(MockPool),
}

/// Point-in-time pool diagnostics for health endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStatus {
    pub backend: BackendKind,
    pub connections: u32,
    pub idle_connections: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statements_served: Option<u64>,
}

impl DbPool {
    /// Build a pool for the configured backend. Never fails: when the
    /// PostgreSQL pool cannot be built the mock backend is used instead,
    /// so startup proceeds in a degraded mode rather than aborting.
    pub async fn connect(settings: &DbConfig) -> DbPool {
        match settings.backend {
            BackendKind::Mock => {
                tracing::info!("mock database backend selected");
                DbPool::Mock(MockPool::new())
            }
            BackendKind::Postgres => Self::connect_postgres(settings).await,
        }
    }

    #[cfg(feature = "postgres")]
    async fn connect_postgres(settings: &DbConfig) -> DbPool {
        match PgManager::new(settings).build_pool(settings).await {
            Ok(pool) => {
                tracing::info!(
                    host = %settings.host,
                    port = settings.port,
                    dbname = %settings.dbname,
                    "postgres pool ready"
                );
                DbPool::Postgres(pool)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "postgres pool unavailable, falling back to mock backend"
                );
                DbPool::Mock(MockPool::new())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    #[allow(clippy::unused_async)]
    async fn connect_postgres(_settings: &DbConfig) -> DbPool {
        tracing::warn!("postgres support not compiled in, using mock backend");
        DbPool::Mock(MockPool::new())
    }

    #[must_use]
    pub fn backend(&self) -> BackendKind {
        match self {
            #[cfg(feature = "postgres")]
            DbPool::Postgres(_) => BackendKind::Postgres,
            DbPool::Mock(_) => BackendKind::Mock,
        }
    }

    /// Check a connection out of the pool.
    ///
    /// # Errors
    /// Returns `DbError` if no connection becomes available within the
    /// pool's connection timeout.
    pub async fn acquire(&self) -> Result<DbConnection, DbError> {
        match self {
            #[cfg(feature = "postgres")]
            DbPool::Postgres(pool) => {
                let conn = pool.get_owned().await?;
                Ok(DbConnection::Postgres(conn))
            }
            DbPool::Mock(pool) => Ok(DbConnection::Mock(pool.clone())),
        }
    }

    #[must_use]
    pub fn status(&self) -> PoolStatus {
        match self {
            #[cfg(feature = "postgres")]
            DbPool::Postgres(pool) => {
                let state = pool.state();
                PoolStatus {
                    backend: BackendKind::Postgres,
                    connections: state.connections,
                    idle_connections: state.idle_connections,
                    statements_served: None,
                }
            }
            DbPool::Mock(pool) => PoolStatus {
                backend: BackendKind::Mock,
                connections: 0,
                idle_connections: 0,
                statements_served: Some(pool.statements_served()),
            },
        }
    }
}

impl DbConnection {
    #[must_use]
    pub fn backend(&self) -> BackendKind {
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(_) => BackendKind::Postgres,
            DbConnection::Mock(_) => BackendKind::Mock,
        }
    }

    /// Run one statement on this connection.
    ///
    /// # Errors
    /// Returns errors from statement preparation or execution.
    pub async fn run_statement(
        &self,
        query: &str,
        params: &[DbValue],
    ) -> Result<ResultSet, DbError> {
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => postgres::run_statement(&**conn, query, params).await,
            DbConnection::Mock(pool) => Ok(pool.run_statement(query, params)),
        }
    }

    /// Run a batch of statements as one transaction.
    ///
    /// # Errors
    /// Returns the first failing statement's error after rolling back.
    pub async fn run_transaction(
        &mut self,
        queries: &[QueryAndParams],
    ) -> Result<Vec<ResultSet>, DbError> {
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => postgres::run_transaction(&mut *conn, queries).await,
            DbConnection::Mock(pool) => Ok(pool.run_transaction(queries)),
        }
    }
}

/// Build the backend from `settings` and install it as the process-wide
/// pool, replacing any previous one. Returns the backend actually selected
/// so callers can tell whether the fallback kicked in.
pub async fn initialize(settings: &DbConfig) -> BackendKind {
    let pool = DbPool::connect(settings).await;
    let backend = pool.backend();
    let mut guard = ACTIVE_POOL.write().unwrap_or_else(PoisonError::into_inner);
    if guard.replace(pool).is_some() {
        tracing::info!("replaced previously initialized database pool");
    }
    backend
}

/// [`initialize`] with settings resolved from the environment.
pub async fn initialize_from_env() -> BackendKind {
    initialize(&DbConfig::from_env()).await
}

/// Clone out the process-wide pool, if one has been initialized.
#[must_use]
pub fn active_pool() -> Option<DbPool> {
    ACTIVE_POOL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// The process-wide pool, or `DbError::NotInitialized`.
///
/// # Errors
/// Returns `DbError::NotInitialized` when [`initialize`] has not run.
pub fn require_pool() -> Result<DbPool, DbError> {
    active_pool().ok_or(DbError::NotInitialized)
}

/// Drop the process-wide pool. Checked-out connections keep their clone of
/// the pool alive until they are released; new queries fail with
/// `DbError::NotInitialized` immediately.
pub fn close() {
    let previous = ACTIVE_POOL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    if previous.is_some() {
        tracing::info!("database pool closed");
    }
}

/// Diagnostics for the process-wide pool, or `None` before initialization.
#[must_use]
pub fn pool_status() -> Option<PoolStatus> {
    active_pool().map(|pool| pool.status())
}

/// Verify the active pool can answer a trivial query. Logs failures and
/// reports them as `false` instead of propagating, so health checks stay
/// simple.
pub async fn test_connection() -> bool {
    match probe_server_time().await {
        Ok(now) => {
            tracing::debug!(server_time = ?now, "database connection verified");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "database connection test failed");
            false
        }
    }
}

async fn probe_server_time() -> Result<Option<DbValue>, DbError> {
    let pool = require_pool()?;
    let conn = pool.acquire().await?;
    let result = conn.run_statement("SELECT NOW()", &[]).await?;
    Ok(result.first_value("now").cloned())
}
