//! Connection pools.
//!
//! A [`ConnPool`] is whatever a driver hands back from `open`: it executes
//! statements and returns rows. The session owns it once installed.

use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::Result;
use crate::value::SqlValue;

/// A result row; each column rendered as text, `None` for NULL.
pub type Row = Vec<Option<String>>;

/// A pool of database connections.
#[async_trait]
pub trait ConnPool: Debug + Send + Sync {
    /// Executes a statement and returns the number of rows affected.
    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<u64>;

    /// Runs a query and returns all rows.
    async fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Row>>;
}

/// A pool that records statements instead of executing them.
///
/// Every query returns no rows, so existence checks report "missing".
#[derive(Debug, Default)]
pub struct DryRunPool {
    statements: Mutex<Vec<(String, Vec<SqlValue>)>>,
}

impl DryRunPool {
    /// Creates an empty dry-run pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded statements with their arguments.
    #[must_use]
    pub fn statements(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the recorded SQL text only.
    #[must_use]
    pub fn sql(&self) -> Vec<String> {
        self.statements().into_iter().map(|(sql, _)| sql).collect()
    }

    fn record(&self, sql: &str, args: &[SqlValue]) {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((sql.to_string(), args.to_vec()));
    }
}

#[async_trait]
impl ConnPool for DryRunPool {
    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<u64> {
        self.record(sql, args);
        Ok(0)
    }

    async fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Row>> {
        self.record(sql, args);
        Ok(Vec::new())
    }
}
