// PostgreSQL backend - the real driver behind the pool facade.
//
// Split into sub-modules:
// - manager: bb8 connection manager and pool construction
// - params: parameter conversion between DbValue and PostgreSQL types
// - query: statement dispatch and result extraction
// - transaction: multi-statement transactions with rollback on failure

pub mod manager;
pub mod params;
pub mod query;
pub mod transaction;

pub use manager::{PgManager, PgPool};
pub use params::Params;
pub use query::run_statement;
pub use transaction::run_transaction;
