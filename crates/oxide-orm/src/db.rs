//! The ORM session.

use std::sync::Arc;

use tracing::{debug, info};

use crate::callbacks::Callbacks;
use crate::clause::SqlWriter;
use crate::dialect::Dialector;
use crate::driver::DriverRegistry;
use crate::error::{OrmError, Result};
use crate::migrator::Migrator;
use crate::pool::{ConnPool, Row};
use crate::schema::Schema;
use crate::statement::Statement;
use crate::value::SqlValue;

/// An ORM session bound to one dialect.
///
/// The session owns the connection pool the dialect installs during
/// [`Dialector::initialize`]; everything executed through it goes to that
/// pool.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use oxide_orm::{Db, DriverRegistry};
///
/// let mut drivers = DriverRegistry::new();
/// oxide_sql_clickhouse::driver::register(&mut drivers);
///
/// let dialect = oxide_sql_clickhouse::ClickHouseDialect::open("http://localhost:8123/default");
/// let db = Db::open(Arc::new(dialect), Arc::new(drivers)).await?;
/// db.auto_migrate(&[events_schema()]).await?;
/// ```
#[derive(Debug)]
pub struct Db {
    dialector: Arc<dyn Dialector>,
    conn_pool: Option<Arc<dyn ConnPool>>,
    callbacks: Callbacks,
    drivers: Arc<DriverRegistry>,
}

impl Db {
    /// Opens a session and initializes `dialector` on it.
    ///
    /// # Errors
    ///
    /// Returns the error produced by [`Dialector::initialize`] unchanged.
    pub async fn open(
        dialector: Arc<dyn Dialector>,
        drivers: Arc<DriverRegistry>,
    ) -> Result<Self> {
        let mut db = Self::uninitialized(Arc::clone(&dialector), drivers);
        dialector.initialize(&mut db).await?;
        info!(dialect = dialector.name(), "Opened session");
        Ok(db)
    }

    /// Creates a session without running the dialect's initializer.
    #[must_use]
    pub fn uninitialized(dialector: Arc<dyn Dialector>, drivers: Arc<DriverRegistry>) -> Self {
        Self {
            dialector,
            conn_pool: None,
            callbacks: Callbacks::default(),
            drivers,
        }
    }

    /// Returns the session's dialect.
    #[must_use]
    pub fn dialector(&self) -> &dyn Dialector {
        self.dialector.as_ref()
    }

    /// Returns the installed connection pool, if any.
    #[must_use]
    pub fn conn_pool(&self) -> Option<&Arc<dyn ConnPool>> {
        self.conn_pool.as_ref()
    }

    /// Installs the connection pool.
    pub fn set_conn_pool(&mut self, pool: Arc<dyn ConnPool>) {
        self.conn_pool = Some(pool);
    }

    /// Returns the registered callbacks.
    #[must_use]
    pub const fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    /// Replaces the registered callbacks.
    pub fn set_callbacks(&mut self, callbacks: Callbacks) {
        self.callbacks = callbacks;
    }

    /// Returns the driver registry the session was opened with.
    #[must_use]
    pub fn drivers(&self) -> &DriverRegistry {
        &self.drivers
    }

    fn pool(&self) -> Result<&Arc<dyn ConnPool>> {
        self.conn_pool.as_ref().ok_or(OrmError::NoConnection)
    }

    /// Executes a statement, returning the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::NoConnection`] without a pool, otherwise the
    /// pool's error.
    pub async fn exec(&self, sql: &str, args: &[SqlValue]) -> Result<u64> {
        let pool = self.pool()?;
        debug!(sql = %self.dialector.explain(sql, args), "Executing SQL");
        pool.exec(sql, args).await
    }

    /// Runs a query, returning all rows.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::NoConnection`] without a pool, otherwise the
    /// pool's error.
    pub async fn query(&self, sql: &str, args: &[SqlValue]) -> Result<Vec<Row>> {
        let pool = self.pool()?;
        debug!(sql = %self.dialector.explain(sql, args), "Querying SQL");
        pool.query(sql, args).await
    }

    /// Returns a new statement rendered with this session's dialect.
    #[must_use]
    pub fn statement(&self) -> Statement<'_> {
        Statement::new(self.dialector())
    }

    /// Returns `identifier` quoted for this session's dialect.
    #[must_use]
    pub fn quote(&self, identifier: &str) -> String {
        let mut out = String::new();
        self.dialector.quote_to(&mut out, identifier);
        out
    }

    /// Renders an INSERT for one row of `schema`.
    ///
    /// Fields present in `values` are bound. Missing fields are left out if
    /// they auto-increment, rendered with the dialect's default expression
    /// if they declare a default, and left out otherwise. Auto-increment
    /// columns are returned when the create processor carries `RETURNING`.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidField`] if `values` names a column the
    /// schema does not have.
    pub fn insert_sql(
        &self,
        schema: &Schema,
        values: &[(&str, SqlValue)],
    ) -> Result<(String, Vec<SqlValue>)> {
        if let Some((name, _)) = values.iter().find(|(n, _)| schema.lookup_field(n).is_none()) {
            return Err(OrmError::InvalidField(format!("{}.{name}", schema.table)));
        }

        let mut row = Vec::new();
        for field in &schema.fields {
            match values.iter().find(|(n, _)| *n == field.name) {
                Some((_, value)) => row.push((field, Some(value.clone()))),
                None if field.auto_increment => {}
                None if field.has_default() => row.push((field, None)),
                None => {}
            }
        }

        let columns: Vec<&str> = row.iter().map(|(f, _)| f.name.as_str()).collect();
        let mut stmt = self.statement();
        stmt.push_sql("INSERT INTO ");
        stmt.write_quoted(&schema.table);
        stmt.push_sql(" ");
        stmt.write_quoted_list(&columns);
        stmt.push_sql(" VALUES (");
        for (idx, (field, value)) in row.into_iter().enumerate() {
            if idx > 0 {
                stmt.push_sql(",");
            }
            match value {
                Some(v) => stmt.add_var(v),
                None => stmt.add_expr(self.dialector.default_value_of(field)),
            }
        }
        stmt.push_sql(")");

        if self.callbacks.create.has_clause("RETURNING") {
            let returning: Vec<&str> = schema
                .fields
                .iter()
                .filter(|f| f.auto_increment)
                .map(|f| f.name.as_str())
                .collect();
            if !returning.is_empty() {
                stmt.push_sql(" RETURNING ");
                for (idx, column) in returning.iter().enumerate() {
                    if idx > 0 {
                        stmt.push_sql(",");
                    }
                    stmt.write_quoted(column);
                }
            }
        }

        Ok(stmt.into_parts())
    }

    /// Inserts one row of `schema`; see [`Db::insert_sql`].
    ///
    /// # Errors
    ///
    /// Returns rendering errors from [`Db::insert_sql`] or the pool's error.
    pub async fn create(&self, schema: &Schema, values: &[(&str, SqlValue)]) -> Result<u64> {
        let (sql, args) = self.insert_sql(schema, values)?;
        self.exec(&sql, &args).await
    }

    /// Returns the dialect's migrator for this session.
    #[must_use]
    pub fn migrator(&self) -> Box<dyn Migrator + '_> {
        self.dialector.migrator(self)
    }

    /// Creates missing tables, columns and indexes for `schemas`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the migrator.
    pub async fn auto_migrate(&self, schemas: &[Schema]) -> Result<()> {
        self.migrator().auto_migrate(schemas).await
    }

    /// Creates the savepoint `name` on this session.
    ///
    /// # Errors
    ///
    /// Returns whatever the dialect's `save_point` reports.
    pub async fn save_point(&self, name: &str) -> Result<()> {
        self.dialector.save_point(self, name).await
    }

    /// Rolls this session back to the savepoint `name`.
    ///
    /// # Errors
    ///
    /// Returns whatever the dialect's `rollback_to` reports.
    pub async fn rollback_to(&self, name: &str) -> Result<()> {
        self.dialector.rollback_to(self, name).await
    }
}
