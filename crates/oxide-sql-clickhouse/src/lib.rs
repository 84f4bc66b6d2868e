//! # oxide-sql-clickhouse
//!
//! ClickHouse dialect for `oxide-orm`.
//!
//! # How ClickHouse differs from other dialects
//!
//! - **Placeholders**: ClickHouse accepts `?` placeholders and the driver
//!   substitutes them client side, so every bound value renders as `?`
//!   regardless of its position. Values are inlined as lossless literals
//!   (see [`literal`]).
//! - **Protocol**: statements always travel over the HTTP interface as plain
//!   text. [`Config::prefer_simple_protocol`] is accepted and has no effect
//!   on the driver.
//! - **Identifier quoting**: double quotes, with each segment of a dotted
//!   name quoted separately (`"db"."table"`).
//! - **[Integer types]**: sized `Int8`..`Int32` and `UInt8`..`UInt32`;
//!   strings with a declared length become `FixedString(n)`.
//! - **[Data skipping indexes]**: indexes cannot be declared inside
//!   `CREATE TABLE` by the generic migrator, so they are created with
//!   separate statements afterwards.
//! - **No savepoints**: ClickHouse has no nested transactions. `SAVEPOINT`
//!   and `ROLLBACK TO SAVEPOINT` are still issued and their failure is
//!   ignored.
//! - **Table engines**: every table needs an `ENGINE = ...` clause, passed
//!   through [`Schema::table_options`](oxide_orm::Schema).
//!
//! [Integer types]: https://clickhouse.com/docs/en/sql-reference/data-types/int-uint
//! [Data skipping indexes]: https://clickhouse.com/docs/en/optimize/skipping-indexes
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use oxide_orm::{DataType, Db, DriverRegistry, Field, Schema};
//! use oxide_sql_clickhouse::{driver, ClickHouseDialect};
//!
//! # async fn run() -> oxide_orm::Result<()> {
//! let mut drivers = DriverRegistry::new();
//! driver::register(&mut drivers);
//!
//! let dialect = ClickHouseDialect::open("http://localhost:8123/default");
//! let db = Db::open(Arc::new(dialect), Arc::new(drivers)).await?;
//!
//! let hits = Schema::new("hits")
//!     .field(Field::new("id", DataType::Uint).size(64).primary_key())
//!     .field(Field::new("url", DataType::String).not_null())
//!     .table_options("ENGINE = MergeTree() ORDER BY id");
//! db.auto_migrate(&[hits]).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod dialect;
pub mod driver;
pub mod literal;
mod migrator;
pub mod types;

pub use config::{Config, DRIVER_NAME};
pub use dialect::ClickHouseDialect;
pub use migrator::ClickHouseMigrator;
