//! # oxide-orm
//!
//! ORM session and dialect plugin contract.
//!
//! This crate provides:
//! - [`Db`], the session a dialect is initialized on and statements run through
//! - [`Dialector`], the trait every database dialect implements
//! - [`ConnPool`] and [`Driver`], the seams to the network or embedded driver
//! - [`DriverRegistry`], an explicit name-to-driver registry
//! - [`GenericMigrator`], DDL generation driven by the dialect's type mapping
//! - [`explain_sql`], rendering statements with their values inlined
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use oxide_orm::driver::sqlite::{SqliteDriver, DRIVER_NAME};
//! use oxide_orm::{Db, DriverRegistry};
//!
//! let mut drivers = DriverRegistry::new();
//! drivers.register(DRIVER_NAME, Arc::new(SqliteDriver::new()));
//!
//! let db = Db::open(Arc::new(my_dialect), Arc::new(drivers)).await?;
//! db.exec("CREATE TABLE t (id INTEGER)", &[]).await?;
//! ```
//!
//! ## Writing a dialect
//!
//! A dialect decides what SQL text is emitted: column types for abstract
//! field types, identifier quoting, placeholder syntax, savepoint commands.
//! In `initialize` it registers the default callbacks with
//! [`callbacks::register_default_callbacks`] and installs a pool, either one
//! handed to it or one opened through [`Db::drivers`].

pub mod callbacks;
pub mod clause;
mod db;
mod dialect;
pub mod driver;
mod error;
pub mod logger;
pub mod migrator;
pub mod pool;
pub mod schema;
mod statement;
mod value;

#[cfg(test)]
mod testing;

pub use callbacks::{register_default_callbacks, CallbackConfig, Callbacks};
pub use clause::{Expr, SqlWriter};
pub use db::Db;
pub use dialect::Dialector;
pub use driver::{Driver, DriverRegistry};
pub use error::{OrmError, Result};
pub use logger::{explain_sql, inline_positional};
pub use migrator::{GenericMigrator, Migrator, MigratorConfig};
pub use pool::{ConnPool, DryRunPool, Row};
pub use schema::{DataType, Field, Index, Schema};
pub use statement::Statement;
pub use value::{SqlValue, ToSqlValue};
