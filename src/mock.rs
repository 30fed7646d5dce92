//! No-storage fallback backend.
//!
//! When PostgreSQL is unreachable (or deliberately not configured) the
//! application still has to come up, so this backend accepts every
//! statement and answers with an empty result set. Nothing is stored or
//! parsed. A served-statement counter is kept so health checks can show
//! the process is limping along on the mock rather than silently healthy.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::results::ResultSet;
use crate::types::{DbValue, QueryAndParams};

/// Stand-in pool that serves empty results. Cloning shares the counter.
#[derive(Debug, Clone, Default)]
pub struct MockPool {
    statements_served: Arc<AtomicU64>,
}

impl MockPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many statements this pool has answered since creation.
    #[must_use]
    pub fn statements_served(&self) -> u64 {
        self.statements_served.load(Ordering::Relaxed)
    }

    /// Accept one statement and answer with an empty result set.
    pub fn run_statement(&self, query: &str, params: &[DbValue]) -> ResultSet {
        self.statements_served.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(query, params = params.len(), "mock backend served statement");
        ResultSet::new()
    }

    /// Accept a batch as if it were a transaction. There is nothing to
    /// commit or roll back; each statement just gets an empty answer.
    pub fn run_transaction(&self, queries: &[QueryAndParams]) -> Vec<ResultSet> {
        queries
            .iter()
            .map(|q| self.run_statement(&q.query, &q.params))
            .collect()
    }
}
