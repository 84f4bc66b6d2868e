//! SQLite driver backed by sqlx.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row as _, Sqlite};

use super::Driver;
use crate::error::Result;
use crate::pool::{ConnPool, Row};
use crate::value::SqlValue;

/// Name the SQLite driver is conventionally registered under.
pub const DRIVER_NAME: &str = "sqlite";

/// Opens sqlx SQLite pools.
#[derive(Debug, Clone, Copy)]
pub struct SqliteDriver {
    max_connections: u32,
}

impl SqliteDriver {
    /// Creates a driver whose pools hold at most one connection.
    ///
    /// A single connection keeps `:memory:` databases and savepoints on the
    /// same underlying handle.
    #[must_use]
    pub const fn new() -> Self {
        Self { max_connections: 1 }
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

impl Default for SqliteDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for SqliteDriver {
    async fn open(&self, dsn: &str) -> Result<Arc<dyn ConnPool>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect(dsn)
            .await?;
        Ok(Arc::new(SqliteConnPool { pool }))
    }
}

/// A sqlx SQLite pool exposed as a [`ConnPool`].
#[derive(Debug, Clone)]
pub struct SqliteConnPool {
    pool: SqlitePool,
}

impl SqliteConnPool {
    /// Wraps an existing sqlx pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnPool for SqliteConnPool {
    async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<u64> {
        let mut query = sqlx::query(sql);
        for arg in args {
            query = bind_param(query, arg.clone());
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Row>> {
        let mut query = sqlx::query(sql);
        for arg in args {
            query = bind_param(query, arg.clone());
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_text).collect())
    }
}

/// Binds a `SqlValue` parameter to a query.
fn bind_param<'q>(
    query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    value: SqlValue,
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        // SQLite integers are signed 64-bit; larger values go in as text.
        SqlValue::UInt(u) => match i64::try_from(u) {
            Ok(i) => query.bind(i),
            Err(_) => query.bind(u.to_string()),
        },
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
        SqlValue::Timestamp(ts) => query.bind(ts),
    }
}

fn row_to_text(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|idx| column_text(row, idx))
        .collect()
}

fn column_text(row: &SqliteRow, idx: usize) -> Option<String> {
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return v;
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return v.map(|n| n.to_string());
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return v.map(|f| f.to_string());
    }
    row.try_get::<Option<Vec<u8>>, _>(idx)
        .ok()
        .flatten()
        .map(|b| String::from_utf8_lossy(&b).into_owned())
}
