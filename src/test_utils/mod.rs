//! Utilities for tests that need a real PostgreSQL server.
//!
//! Only compiled with the `test-utils` feature, which pulls in bundled
//! PostgreSQL binaries; keep it out of production builds.

pub mod embedded;

pub use embedded::{EmbeddedPostgres, setup_embedded_postgres, stop_embedded_postgres};
