//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::{BackendKind, DbConfig};
pub use crate::crud::{
    PagedResult, Pagination, QueryOptions, insert_record, search_within_radius, select_paginated,
    soft_delete, table_exists, update_records,
};
pub use crate::error::DbError;
pub use crate::executor::{execute_query, execute_query_and_params, execute_transaction};
pub use crate::helpers::{sanitize_input, sanitize_value, validate_coordinates};
pub use crate::pool::{
    DbConnection, DbPool, PoolStatus, active_pool, close, initialize, initialize_from_env,
    pool_status, require_pool, test_connection,
};
pub use crate::results::{DbRow, ResultSet};
pub use crate::types::{DbValue, QueryAndParams};

#[cfg(feature = "postgres")]
pub use crate::postgres::{PgManager, PgPool};
