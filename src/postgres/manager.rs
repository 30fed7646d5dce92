use std::future::Future;

use bb8::{ManageConnection, Pool};
use tokio_postgres::config::SslMode;
use tokio_postgres::{Client, NoTls};

use crate::config::DbConfig;
use crate::error::DbError;

/// bb8 pool over Postgres clients.
pub type PgPool = Pool<PgManager>;

/// bb8 manager for Postgres clients.
///
/// Each connection runs its `tokio_postgres::Connection` driver on a
/// spawned task; driver failures are logged there rather than crashing
/// the process, and the pool replaces the dead client on next checkout.
pub struct PgManager {
    config: tokio_postgres::Config,
}

impl PgManager {
    #[must_use]
    pub fn new(settings: &DbConfig) -> Self {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&settings.host)
            .port(settings.port)
            .dbname(&settings.dbname)
            .user(&settings.user)
            .connect_timeout(settings.connect_timeout)
            .ssl_mode(if settings.ssl {
                SslMode::Prefer
            } else {
                SslMode::Disable
            });
        if !settings.password.is_empty() {
            config.password(&settings.password);
        }
        Self { config }
    }

    /// Build a pool from this manager, applying the sizing and timeout
    /// knobs from `settings`. Establishes one connection up front, so a
    /// bad host or bad credentials surface here instead of on first query.
    ///
    /// # Errors
    /// Returns `DbError` if the pool cannot establish its first connection.
    pub async fn build_pool(self, settings: &DbConfig) -> Result<PgPool, DbError> {
        Pool::builder()
            .max_size(settings.max_pool_size)
            .min_idle(Some(1))
            .idle_timeout(Some(settings.idle_timeout))
            .connection_timeout(settings.connect_timeout)
            .retry_connection(false)
            .build(self)
            .await
            .map_err(|e| DbError::Connection(format!("postgres pool error: {e}")))
    }
}

impl ManageConnection for PgManager {
    type Connection = Client;
    type Error = tokio_postgres::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let cfg = self.config.clone();
        async move {
            let (client, connection) = cfg.connect(NoTls).await?;
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::warn!(error = %e, "postgres connection closed with error");
                }
            });
            Ok(client)
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move { conn.simple_query("SELECT 1").await.map(|_| ()) }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}
