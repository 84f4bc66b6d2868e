//! ClickHouse migrator.
//!
//! ClickHouse does not accept index declarations inside `CREATE TABLE`, so
//! indexes are created with separate statements once the table exists.
//! Everything else is the generic migrator unchanged.

use async_trait::async_trait;
use oxide_orm::{Db, Dialector, Expr, Field, GenericMigrator, Migrator, MigratorConfig, Result, Schema};

/// Migrator for ClickHouse sessions.
#[derive(Debug, Clone, Copy)]
pub struct ClickHouseMigrator<'a> {
    inner: GenericMigrator<'a>,
}

impl<'a> ClickHouseMigrator<'a> {
    /// Creates a migrator for `db` rendering with `dialector`.
    #[must_use]
    pub fn new(db: &'a Db, dialector: &'a dyn Dialector) -> Self {
        Self {
            inner: GenericMigrator::new(MigratorConfig {
                db,
                dialector,
                create_index_after_create_table: true,
            }),
        }
    }

    /// Returns the wrapped generic migrator.
    #[must_use]
    pub const fn generic(&self) -> &GenericMigrator<'a> {
        &self.inner
    }
}

#[async_trait]
impl Migrator for ClickHouseMigrator<'_> {
    async fn auto_migrate(&self, schemas: &[Schema]) -> Result<()> {
        self.inner.auto_migrate(schemas).await
    }

    async fn current_database(&self) -> Result<String> {
        self.inner.current_database().await
    }

    async fn create_table(&self, schema: &Schema) -> Result<()> {
        self.inner.create_table(schema).await
    }

    async fn drop_table(&self, table: &str) -> Result<()> {
        self.inner.drop_table(table).await
    }

    async fn has_table(&self, table: &str) -> Result<bool> {
        self.inner.has_table(table).await
    }

    async fn rename_table(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.inner.rename_table(old_name, new_name).await
    }

    async fn add_column(&self, schema: &Schema, field: &str) -> Result<()> {
        self.inner.add_column(schema, field).await
    }

    async fn drop_column(&self, table: &str, column: &str) -> Result<()> {
        self.inner.drop_column(table, column).await
    }

    async fn alter_column(&self, schema: &Schema, field: &str) -> Result<()> {
        self.inner.alter_column(schema, field).await
    }

    async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.inner.has_column(table, column).await
    }

    async fn rename_column(&self, table: &str, old_name: &str, new_name: &str) -> Result<()> {
        self.inner.rename_column(table, old_name, new_name).await
    }

    async fn create_index(&self, schema: &Schema, name: &str) -> Result<()> {
        self.inner.create_index(schema, name).await
    }

    async fn drop_index(&self, table: &str, name: &str) -> Result<()> {
        self.inner.drop_index(table, name).await
    }

    async fn has_index(&self, table: &str, name: &str) -> Result<bool> {
        self.inner.has_index(table, name).await
    }

    fn full_data_type_of(&self, field: &Field) -> Expr {
        self.inner.full_data_type_of(field)
    }
}
