//! Connection settings resolved from the environment.
//!
//! Every field has a default, so resolution never fails: unpopulated or
//! unparseable variables fall back instead of erroring. The pool sizing
//! knobs are fixed by policy (20 connections, 30 s idle, 2 s connect) and
//! are overridden in code only by tests.

use std::env;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DBNAME: &str = "cattle_tracking";
pub const DEFAULT_USER: &str = "postgres";

pub const DEFAULT_MAX_POOL_SIZE: u32 = 20;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Which backend a pool should be built on.
///
/// `Mock` serves empty results without any server and exists so the rest of
/// the application (and its tests) can run without PostgreSQL; it is a
/// degraded-mode fallback, not an in-memory database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Real PostgreSQL driver
    #[default]
    Postgres,
    /// No-storage stand-in returning empty results
    Mock,
}

/// Resolved connection settings. Immutable once built.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    /// Ask the server for TLS when it offers it (set in production).
    pub ssl: bool,
    /// Requested backend; `Postgres` still falls back to the mock when the
    /// real pool cannot be built.
    pub backend: BackendKind,
    pub max_pool_size: u32,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dbname: DEFAULT_DBNAME.to_string(),
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            ssl: false,
            backend: BackendKind::Postgres,
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl DbConfig {
    /// Resolve settings from `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`,
    /// `DB_PASSWORD`, `DB_BACKEND` and `APP_ENV`, with defaults for
    /// anything unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        DbConfig {
            host: get("DB_HOST").unwrap_or(defaults.host),
            port: get("DB_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            dbname: get("DB_NAME").unwrap_or(defaults.dbname),
            user: get("DB_USER").unwrap_or(defaults.user),
            password: get("DB_PASSWORD").unwrap_or(defaults.password),
            ssl: get("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production")),
            backend: match get("DB_BACKEND") {
                Some(v) if v.eq_ignore_ascii_case("mock") => BackendKind::Mock,
                _ => BackendKind::Postgres,
            },
            ..defaults
        }
    }

    /// Settings that always resolve to the mock backend.
    #[must_use]
    pub fn mock() -> Self {
        DbConfig {
            backend: BackendKind::Mock,
            ..Self::default()
        }
    }
}
