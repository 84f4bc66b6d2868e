//! Tests for session initialization.

mod common;
use common::*;

use std::sync::Arc;

use oxide_orm::driver::sqlite::{SqliteDriver, DRIVER_NAME as SQLITE};
use oxide_orm::{Db, Dialector, DriverRegistry, OrmError};
use oxide_sql_clickhouse::{driver, ClickHouseDialect, Config};

#[tokio::test]
async fn adopts_preopened_pool() {
    let (db, pool) = dry_run_db().await;

    assert!(db.conn_pool().is_some());
    assert_eq!(db.dialector().name(), "clickhouse");
    db.exec("SELECT 1", &[]).await.unwrap();
    assert_eq!(pool.sql(), vec!["SELECT 1"]);
}

#[tokio::test]
async fn registers_callbacks_with_returning() {
    let (db, _) = dry_run_db().await;
    let callbacks = db.callbacks();

    assert!(callbacks.is_registered());
    assert!(callbacks.create.has_clause("RETURNING"));
    assert!(callbacks.update.has_clause("RETURNING"));
    assert!(callbacks.delete.has_clause("RETURNING"));
    assert!(!callbacks.query.has_clause("RETURNING"));
    assert!(callbacks.create.has_clause("INSERT"));
    assert!(callbacks.create.has_callback("create"));
}

#[tokio::test]
async fn opens_pool_through_registry() {
    let mut drivers = DriverRegistry::new();
    drivers.register(SQLITE, Arc::new(SqliteDriver::new()));
    let dialect = ClickHouseDialect::new(Config::new("sqlite::memory:").driver_name(SQLITE));

    let db = Db::open(Arc::new(dialect), Arc::new(drivers)).await.unwrap();

    db.exec("CREATE TABLE t (id INTEGER)", &[]).await.unwrap();
    let rows = db.query("SELECT count(*) FROM t", &[]).await.unwrap();
    assert_eq!(rows, vec![vec![Some("0".to_string())]]);
}

#[tokio::test]
async fn unknown_driver_fails_open() {
    let dialect = ClickHouseDialect::open("http://localhost:8123/default");
    let err = Db::open(Arc::new(dialect), Arc::new(DriverRegistry::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, OrmError::UnknownDriver(name) if name == "clickhouse"));
}

#[tokio::test]
async fn driver_open_error_propagates() {
    let mut drivers = DriverRegistry::new();
    driver::register(&mut drivers);
    let dialect = ClickHouseDialect::open("postgres://localhost/x");

    let err = Db::open(Arc::new(dialect), Arc::new(drivers))
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::Driver(_)));
}

#[tokio::test]
async fn empty_driver_name_leaves_no_pool() {
    let dialect = ClickHouseDialect::new(Config::new("ignored").driver_name(""));
    let db = Db::open(Arc::new(dialect), Arc::new(DriverRegistry::new()))
        .await
        .unwrap();

    assert!(db.conn_pool().is_none());
    assert!(db.callbacks().is_registered());
    assert!(matches!(
        db.exec("SELECT 1", &[]).await,
        Err(OrmError::NoConnection)
    ));
}

#[tokio::test]
async fn preopened_pool_wins_over_driver() {
    let pool = Arc::new(FailingPool::default());
    let dialect = ClickHouseDialect::new(
        Config::new("http://localhost:8123/default").conn(pool.clone()),
    );

    // No driver is registered, so opening one would fail.
    let db = Db::open(Arc::new(dialect), Arc::new(DriverRegistry::new()))
        .await
        .unwrap();
    assert!(db.exec("SELECT 1", &[]).await.is_err());
    assert_eq!(pool.calls(), 1);
}
