//! Schema migration.
//!
//! [`GenericMigrator`] renders DDL through the session's dialect: column
//! types come from [`Dialector::data_type_of`], identifiers from
//! [`Dialector::quote_to`], bound values from [`Dialector::bind_var_to`].
//! Dialects wrap it and adjust [`MigratorConfig`] rather than reimplement it.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::clause::{Expr, SqlWriter};
use crate::db::Db;
use crate::dialect::Dialector;
use crate::error::{OrmError, Result};
use crate::schema::{Field, Index, Schema};
use crate::statement::Statement;
use crate::value::SqlValue;

/// Schema operations a dialect exposes.
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Creates missing tables, and missing columns and indexes of existing
    /// tables.
    async fn auto_migrate(&self, schemas: &[Schema]) -> Result<()>;

    /// Returns the name of the connection's current database.
    async fn current_database(&self) -> Result<String>;

    /// Creates the table for `schema`.
    async fn create_table(&self, schema: &Schema) -> Result<()>;

    /// Drops `table` if it exists.
    async fn drop_table(&self, table: &str) -> Result<()>;

    /// Returns whether `table` exists.
    async fn has_table(&self, table: &str) -> Result<bool>;

    /// Renames `old_name` to `new_name`.
    async fn rename_table(&self, old_name: &str, new_name: &str) -> Result<()>;

    /// Adds the column `field` of `schema`.
    async fn add_column(&self, schema: &Schema, field: &str) -> Result<()>;

    /// Drops `column` from `table`.
    async fn drop_column(&self, table: &str, column: &str) -> Result<()>;

    /// Changes the type of the column `field` of `schema` to match it.
    async fn alter_column(&self, schema: &Schema, field: &str) -> Result<()>;

    /// Returns whether `table` has `column`.
    async fn has_column(&self, table: &str, column: &str) -> Result<bool>;

    /// Renames a column of `table`.
    async fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<()>;

    /// Creates the index `name` of `schema`.
    async fn create_index(&self, schema: &Schema, name: &str) -> Result<()>;

    /// Drops the index `name` of `table`.
    async fn drop_index(&self, table: &str, name: &str) -> Result<()>;

    /// Returns whether `table` has the index `name`.
    async fn has_index(&self, table: &str, name: &str) -> Result<bool>;

    /// Returns the full column definition of `field`: its type followed by
    /// NOT NULL, UNIQUE and DEFAULT as declared.
    fn full_data_type_of(&self, field: &Field) -> Expr;
}

/// Configuration of a [`GenericMigrator`].
#[derive(Debug, Clone, Copy)]
pub struct MigratorConfig<'a> {
    /// Session statements are executed on.
    pub db: &'a Db,
    /// Dialect used for rendering.
    pub dialector: &'a dyn Dialector,
    /// Create indexes with separate statements after `CREATE TABLE` instead
    /// of declaring them inline.
    pub create_index_after_create_table: bool,
}

/// Dialect-independent migrator.
#[derive(Debug, Clone, Copy)]
pub struct GenericMigrator<'a> {
    /// Configuration.
    pub config: MigratorConfig<'a>,
}

impl<'a> GenericMigrator<'a> {
    /// Creates a migrator from `config`.
    #[must_use]
    pub const fn new(config: MigratorConfig<'a>) -> Self {
        Self { config }
    }

    fn statement(&self) -> Statement<'a> {
        Statement::new(self.config.dialector)
    }

    async fn exec(&self, stmt: Statement<'_>) -> Result<()> {
        let (sql, vars) = stmt.into_parts();
        self.config.db.exec(&sql, &vars).await?;
        Ok(())
    }

    async fn count(&self, stmt: Statement<'_>) -> Result<i64> {
        let (sql, vars) = stmt.into_parts();
        let rows = self.config.db.query(&sql, &vars).await?;
        let Some(cell) = rows.first().and_then(|row| row.first()).cloned().flatten() else {
            return Ok(0);
        };
        cell.trim()
            .parse()
            .map_err(|_| OrmError::Migration(format!("expected a count, got {cell:?}")))
    }

    /// Renders the `CREATE TABLE` statement for `schema`.
    ///
    /// Inline `INDEX` declarations are only rendered when
    /// `create_index_after_create_table` is off.
    #[must_use]
    pub fn create_table_sql(&self, schema: &Schema) -> (String, Vec<SqlValue>) {
        let mut stmt = self.statement();
        stmt.push_sql("CREATE TABLE ");
        stmt.write_quoted(&schema.table);
        stmt.push_sql(" (");

        let mut has_primary_key_in_data_type = false;
        for field in &schema.fields {
            let full = self.full_data_type_of(field);
            has_primary_key_in_data_type |= full.sql.to_uppercase().contains("PRIMARY KEY");
            stmt.write_quoted(&field.name);
            stmt.push_char(' ');
            stmt.add_expr(full);
            stmt.push_char(',');
        }

        let primary: Vec<&str> = schema.primary_fields().map(|f| f.name.as_str()).collect();
        if !has_primary_key_in_data_type && !primary.is_empty() {
            stmt.push_sql("PRIMARY KEY ");
            stmt.write_quoted_list(&primary);
            stmt.push_char(',');
        }

        if !self.config.create_index_after_create_table {
            for index in &schema.indexes {
                if let Some(class) = &index.class {
                    stmt.push_sql(class);
                    stmt.push_char(' ');
                }
                stmt.push_sql("INDEX ");
                stmt.write_quoted(&index.name);
                stmt.push_char(' ');
                stmt.write_quoted_list(&index.fields);
                stmt.push_char(',');
            }
        }

        let (mut sql, vars) = stmt.into_parts();
        if sql.ends_with(',') {
            sql.pop();
        }
        sql.push(')');
        if let Some(options) = &schema.table_options {
            sql.push(' ');
            sql.push_str(options);
        }
        (sql, vars)
    }

    /// Renders the `CREATE INDEX` statement for `index` on `table`.
    #[must_use]
    pub fn create_index_sql(&self, table: &str, index: &Index) -> (String, Vec<SqlValue>) {
        let mut stmt = self.statement();
        stmt.push_sql("CREATE ");
        if let Some(class) = &index.class {
            stmt.push_sql(class);
            stmt.push_char(' ');
        }
        stmt.push_sql("INDEX ");
        stmt.write_quoted(&index.name);
        stmt.push_sql(" ON ");
        stmt.write_quoted(table);
        if let Some(index_type) = &index.index_type {
            stmt.push_sql(" USING ");
            stmt.push_sql(index_type);
        }
        stmt.push_char(' ');
        stmt.write_quoted_list(&index.fields);
        stmt.into_parts()
    }

    fn lookup_field<'s>(schema: &'s Schema, name: &str) -> Result<&'s Field> {
        schema
            .lookup_field(name)
            .ok_or_else(|| OrmError::InvalidField(format!("{}.{name}", schema.table)))
    }
}

#[async_trait]
impl Migrator for GenericMigrator<'_> {
    async fn auto_migrate(&self, schemas: &[Schema]) -> Result<()> {
        for schema in schemas {
            if !self.has_table(&schema.table).await? {
                self.create_table(schema).await?;
                continue;
            }

            for field in &schema.fields {
                if !self.has_column(&schema.table, &field.name).await? {
                    self.add_column(schema, &field.name).await?;
                }
            }
            for index in &schema.indexes {
                if !self.has_index(&schema.table, &index.name).await? {
                    self.create_index(schema, &index.name).await?;
                }
            }
        }
        Ok(())
    }

    async fn current_database(&self) -> Result<String> {
        let rows = self.config.db.query("SELECT DATABASE()", &[]).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .flatten()
            .unwrap_or_default())
    }

    async fn create_table(&self, schema: &Schema) -> Result<()> {
        info!(table = %schema.table, "Creating table");
        let (sql, vars) = self.create_table_sql(schema);
        self.config.db.exec(&sql, &vars).await?;

        if self.config.create_index_after_create_table {
            for index in &schema.indexes {
                self.create_index(schema, &index.name).await?;
            }
        }
        Ok(())
    }

    async fn drop_table(&self, table: &str) -> Result<()> {
        let mut stmt = self.statement();
        stmt.push_sql("DROP TABLE IF EXISTS ");
        stmt.write_quoted(table);
        self.exec(stmt).await
    }

    async fn has_table(&self, table: &str) -> Result<bool> {
        let database = self.current_database().await?;
        let mut stmt = self.statement();
        stmt.push_sql(
            "SELECT count(*) FROM information_schema.tables WHERE table_schema = ",
        );
        stmt.add_var(database);
        stmt.push_sql(" AND table_name = ");
        stmt.add_var(table);
        Ok(self.count(stmt).await? > 0)
    }

    async fn rename_table(&self, old_name: &str, new_name: &str) -> Result<()> {
        let mut stmt = self.statement();
        stmt.push_sql("ALTER TABLE ");
        stmt.write_quoted(old_name);
        stmt.push_sql(" RENAME TO ");
        stmt.write_quoted(new_name);
        self.exec(stmt).await
    }

    async fn add_column(&self, schema: &Schema, field: &str) -> Result<()> {
        let field = Self::lookup_field(schema, field)?;
        debug!(table = %schema.table, column = %field.name, "Adding column");
        let mut stmt = self.statement();
        stmt.push_sql("ALTER TABLE ");
        stmt.write_quoted(&schema.table);
        stmt.push_sql(" ADD ");
        stmt.write_quoted(&field.name);
        stmt.push_char(' ');
        stmt.add_expr(self.full_data_type_of(field));
        self.exec(stmt).await
    }

    async fn drop_column(&self, table: &str, column: &str) -> Result<()> {
        let mut stmt = self.statement();
        stmt.push_sql("ALTER TABLE ");
        stmt.write_quoted(table);
        stmt.push_sql(" DROP COLUMN ");
        stmt.write_quoted(column);
        self.exec(stmt).await
    }

    async fn alter_column(&self, schema: &Schema, field: &str) -> Result<()> {
        let field = Self::lookup_field(schema, field)?;
        let mut stmt = self.statement();
        stmt.push_sql("ALTER TABLE ");
        stmt.write_quoted(&schema.table);
        stmt.push_sql(" ALTER COLUMN ");
        stmt.write_quoted(&field.name);
        stmt.push_sql(" TYPE ");
        stmt.add_expr(self.full_data_type_of(field));
        self.exec(stmt).await
    }

    async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        let database = self.current_database().await?;
        let mut stmt = self.statement();
        stmt.push_sql(
            "SELECT count(*) FROM information_schema.columns WHERE table_schema = ",
        );
        stmt.add_var(database);
        stmt.push_sql(" AND table_name = ");
        stmt.add_var(table);
        stmt.push_sql(" AND column_name = ");
        stmt.add_var(column);
        Ok(self.count(stmt).await? > 0)
    }

    async fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<()> {
        let mut stmt = self.statement();
        stmt.push_sql("ALTER TABLE ");
        stmt.write_quoted(table);
        stmt.push_sql(" RENAME COLUMN ");
        stmt.write_quoted(old_name);
        stmt.push_sql(" TO ");
        stmt.write_quoted(new_name);
        self.exec(stmt).await
    }

    async fn create_index(&self, schema: &Schema, name: &str) -> Result<()> {
        let index = schema
            .indexes
            .iter()
            .find(|idx| idx.name == name)
            .ok_or_else(|| OrmError::Migration(format!("index {name} not found on {}", schema.table)))?;
        debug!(table = %schema.table, index = %name, "Creating index");
        let (sql, vars) = self.create_index_sql(&schema.table, index);
        self.config.db.exec(&sql, &vars).await?;
        Ok(())
    }

    async fn drop_index(&self, table: &str, name: &str) -> Result<()> {
        let mut stmt = self.statement();
        stmt.push_sql("DROP INDEX ");
        stmt.write_quoted(name);
        stmt.push_sql(" ON ");
        stmt.write_quoted(table);
        self.exec(stmt).await
    }

    async fn has_index(&self, table: &str, name: &str) -> Result<bool> {
        let database = self.current_database().await?;
        let mut stmt = self.statement();
        stmt.push_sql(
            "SELECT count(*) FROM information_schema.statistics WHERE table_schema = ",
        );
        stmt.add_var(database);
        stmt.push_sql(" AND table_name = ");
        stmt.add_var(table);
        stmt.push_sql(" AND index_name = ");
        stmt.add_var(name);
        Ok(self.count(stmt).await? > 0)
    }

    fn full_data_type_of(&self, field: &Field) -> Expr {
        let mut expr = Expr::raw(self.config.dialector.data_type_of(field));
        if field.not_null {
            expr.sql.push_str(" NOT NULL");
        }
        if field.unique {
            expr.sql.push_str(" UNIQUE");
        }
        if field.has_default() {
            if let Some(default) = &field.default_value {
                expr.sql.push_str(" DEFAULT ");
                expr.sql.push_str(default);
            }
        }
        expr
    }
}
