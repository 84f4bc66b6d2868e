//! A small numbered-placeholder dialect for unit tests.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use crate::callbacks::{register_default_callbacks, CallbackConfig};
use crate::clause::{Expr, SqlWriter};
use crate::db::Db;
use crate::dialect::Dialector;
use crate::driver::DriverRegistry;
use crate::error::Result;
use crate::logger::explain_sql;
use crate::migrator::{GenericMigrator, Migrator, MigratorConfig};
use crate::pool::{ConnPool, DryRunPool};
use crate::schema::{DataType, Field};
use crate::value::SqlValue;

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$(\d+)").unwrap());

#[derive(Debug, Default)]
pub struct TestDialect {
    pub pool: Option<Arc<dyn ConnPool>>,
    pub with_returning: bool,
}

#[async_trait]
impl Dialector for TestDialect {
    fn name(&self) -> &'static str {
        "test"
    }

    async fn initialize(&self, db: &mut Db) -> Result<()> {
        register_default_callbacks(
            db,
            &CallbackConfig {
                with_returning: self.with_returning,
            },
        );
        if let Some(pool) = &self.pool {
            db.set_conn_pool(Arc::clone(pool));
        }
        Ok(())
    }

    fn migrator<'a>(&'a self, db: &'a Db) -> Box<dyn Migrator + 'a> {
        Box::new(GenericMigrator::new(MigratorConfig {
            db,
            dialector: self,
            create_index_after_create_table: false,
        }))
    }

    fn default_value_of(&self, _field: &Field) -> Expr {
        Expr::raw("DEFAULT")
    }

    fn bind_var_to(&self, writer: &mut dyn SqlWriter, position: usize, _value: &SqlValue) {
        writer.push_char('$');
        writer.push_sql(&position.to_string());
    }

    fn quote_to(&self, writer: &mut dyn SqlWriter, identifier: &str) {
        writer.push_char('`');
        writer.push_sql(identifier);
        writer.push_char('`');
    }

    fn explain(&self, sql: &str, vars: &[SqlValue]) -> String {
        explain_sql(sql, Some(&*NUMERIC), "'", vars)
    }

    fn data_type_of(&self, field: &Field) -> String {
        match &field.data_type {
            DataType::Bool => "boolean".to_string(),
            DataType::Int | DataType::Uint => "bigint".to_string(),
            DataType::String => "text".to_string(),
            other => other.as_str().to_string(),
        }
    }

    async fn save_point(&self, tx: &Db, name: &str) -> Result<()> {
        tx.exec(&format!("SAVEPOINT {name}"), &[]).await?;
        Ok(())
    }

    async fn rollback_to(&self, tx: &Db, name: &str) -> Result<()> {
        tx.exec(&format!("ROLLBACK TO SAVEPOINT {name}"), &[]).await?;
        Ok(())
    }
}

/// Opens a session on a [`TestDialect`] backed by a fresh dry-run pool.
pub async fn dry_run_db(with_returning: bool) -> (Db, Arc<DryRunPool>) {
    let pool = Arc::new(DryRunPool::new());
    let dialect = TestDialect {
        pool: Some(pool.clone() as Arc<dyn ConnPool>),
        with_returning,
    };
    let db = Db::open(Arc::new(dialect), Arc::new(DriverRegistry::new()))
        .await
        .unwrap();
    (db, pool)
}
