//! The dialect plugin contract.
//!
//! A dialect translates the ORM's abstract operations into one database's
//! SQL. The session calls [`Dialector::initialize`] once when it is opened
//! and the rendering methods every time a statement is compiled.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::clause::{Expr, SqlWriter};
use crate::db::Db;
use crate::error::Result;
use crate::migrator::Migrator;
use crate::schema::Field;
use crate::value::SqlValue;

/// A database dialect.
#[async_trait]
pub trait Dialector: Debug + Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Sets up a freshly opened session: registers callbacks and installs
    /// the connection pool.
    async fn initialize(&self, db: &mut Db) -> Result<()>;

    /// Returns the migrator for this dialect.
    fn migrator<'a>(&'a self, db: &'a Db) -> Box<dyn Migrator + 'a>;

    /// Returns the expression inserted for a field left at its default.
    fn default_value_of(&self, field: &Field) -> Expr;

    /// Writes the placeholder for the bound value at `position` (1-based).
    fn bind_var_to(&self, writer: &mut dyn SqlWriter, position: usize, value: &SqlValue);

    /// Writes `identifier` quoted.
    fn quote_to(&self, writer: &mut dyn SqlWriter, identifier: &str);

    /// Renders `sql` with `vars` inlined, for logging.
    fn explain(&self, sql: &str, vars: &[SqlValue]) -> String;

    /// Returns the column type for `field`.
    fn data_type_of(&self, field: &Field) -> String;

    /// Creates the savepoint `name` inside the transaction `tx`.
    async fn save_point(&self, tx: &Db, name: &str) -> Result<()>;

    /// Rolls the transaction `tx` back to the savepoint `name`.
    async fn rollback_to(&self, tx: &Db, name: &str) -> Result<()>;
}
