//! Data-access layer for the cattle-tracking backend.
//!
//! Everything the application asks of PostgreSQL goes through here: a
//! process-wide connection pool with an explicit lifecycle, a mock
//! fallback backend so the app still starts when the database is
//! unreachable, single-statement and transactional execution with
//! guaranteed connection release, and the generic CRUD operations
//! (insert-returning-id, conditional update, paginated listing, soft
//! delete, geo-radius search) shared by every entity table.
//!
//! ```no_run
//! use corral_db::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DbError> {
//!     initialize(&DbConfig::from_env()).await;
//!
//!     let id = insert_record("animals", &[
//!         ("name", DbValue::Text("Bessie".into())),
//!         ("tag_number", DbValue::Text("A-104".into())),
//!     ])
//!     .await?;
//!     println!("inserted animal {id}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crud;
pub mod error;
pub mod executor;
pub mod helpers;
pub mod mock;
pub mod pool;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod prelude;
pub mod results;
#[cfg(feature = "test-utils")]
pub mod test_utils;
pub mod types;

pub use config::{BackendKind, DbConfig};
pub use error::DbError;
pub use results::{DbRow, ResultSet};
pub use types::{DbValue, QueryAndParams};
