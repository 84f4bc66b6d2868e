//! Shared fixtures for the ClickHouse dialect tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use oxide_orm::{
    ConnPool, DataType, Db, DriverRegistry, DryRunPool, Field, Index, OrmError, Result, Row,
    Schema, SqlValue,
};
use oxide_sql_clickhouse::{ClickHouseDialect, Config};

/// A pool whose every call fails.
#[derive(Debug, Default)]
pub struct FailingPool {
    pub calls: AtomicUsize,
}

impl FailingPool {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnPool for FailingPool {
    async fn exec(&self, sql: &str, _args: &[SqlValue]) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(OrmError::Driver(format!("Syntax error: {sql}")))
    }

    async fn query(&self, sql: &str, _args: &[SqlValue]) -> Result<Vec<Row>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(OrmError::Driver(format!("Syntax error: {sql}")))
    }
}

/// Opens a ClickHouse session over `pool`.
pub async fn open_with(pool: Arc<dyn ConnPool>) -> Db {
    let dialect = ClickHouseDialect::new(Config::new("").conn(pool));
    Db::open(Arc::new(dialect), Arc::new(DriverRegistry::new()))
        .await
        .unwrap()
}

/// Opens a ClickHouse session recording statements instead of running them.
pub async fn dry_run_db() -> (Db, Arc<DryRunPool>) {
    let pool = Arc::new(DryRunPool::new());
    let db = open_with(pool.clone()).await;
    (db, pool)
}

pub fn hits() -> Schema {
    Schema::new("hits")
        .field(Field::new("id", DataType::Uint).size(64).primary_key())
        .field(Field::new("url", DataType::String).not_null())
        .field(Field::new("visits", DataType::Int).size(16).default_value("0"))
        .index(Index::new("idx_url", &["url"]))
        .table_options("ENGINE = MergeTree() ORDER BY id")
}

pub fn events() -> Schema {
    Schema::new("events")
        .field(
            Field::new("id", DataType::Uint)
                .size(32)
                .primary_key()
                .auto_increment(),
        )
        .field(Field::new("name", DataType::String))
        .field(Field::new("created", DataType::Time).default_value("now()"))
}
