use postgresql_embedded::PostgreSQL;

use crate::config::{BackendKind, DbConfig};

/// A running embedded PostgreSQL instance plus the settings that reach it.
/// Keep the handle alive for as long as the server is needed.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub config: DbConfig,
}

/// Start an embedded PostgreSQL server and create `dbname` on it.
///
/// The returned config points at the embedded server with its superuser
/// credentials, ready to pass to [`crate::pool::initialize`].
///
/// # Errors
/// Returns an error if the bundled server cannot be set up or started, or
/// if database creation fails.
pub async fn setup_embedded_postgres(
    dbname: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    let mut postgresql = PostgreSQL::default();
    postgresql.setup().await?;
    postgresql.start().await?;
    postgresql.create_database(dbname).await?;

    let settings = postgresql.settings();
    let config = DbConfig {
        host: settings.host.clone(),
        port: settings.port,
        dbname: dbname.to_string(),
        user: settings.username.clone(),
        password: settings.password.clone(),
        ssl: false,
        backend: BackendKind::Postgres,
        ..DbConfig::default()
    };

    Ok(EmbeddedPostgres { postgresql, config })
}

/// Stop a previously started embedded PostgreSQL instance.
///
/// # Errors
/// Returns an error if the server does not shut down cleanly.
pub async fn stop_embedded_postgres(
    mut postgres: EmbeddedPostgres,
) -> Result<(), Box<dyn std::error::Error>> {
    postgres.postgresql.stop().await?;
    Ok(())
}
