//! ClickHouse dialect implementation.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use oxide_orm::callbacks::{register_default_callbacks, CallbackConfig};
use oxide_orm::{explain_sql, Db, Dialector, Expr, Field, Migrator, Result, SqlValue, SqlWriter};
use regex::Regex;
use tracing::debug;

use crate::config::{Config, DRIVER_NAME};
use crate::migrator::ClickHouseMigrator;
use crate::types;

static NUMERIC_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("Invalid numeric placeholder regex"));

/// ClickHouse dialect.
#[derive(Debug, Clone)]
pub struct ClickHouseDialect {
    config: Config,
}

impl ClickHouseDialect {
    /// Creates a dialect that opens `dsn` through the ClickHouse driver.
    #[must_use]
    pub fn open(dsn: impl Into<String>) -> Self {
        Self {
            config: Config::new(dsn),
        }
    }

    /// Creates a dialect from a complete configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

#[async_trait]
impl Dialector for ClickHouseDialect {
    fn name(&self) -> &'static str {
        DRIVER_NAME
    }

    async fn initialize(&self, db: &mut Db) -> Result<()> {
        register_default_callbacks(
            db,
            &CallbackConfig {
                with_returning: true,
            },
        );

        if let Some(conn) = &self.config.conn {
            debug!("Adopting pre-opened connection pool");
            db.set_conn_pool(Arc::clone(conn));
        } else if !self.config.driver_name.is_empty() {
            debug!(driver = %self.config.driver_name, "Opening connection pool");
            let pool = db
                .drivers()
                .open(&self.config.driver_name, &self.config.dsn)
                .await?;
            db.set_conn_pool(pool);
        }
        Ok(())
    }

    fn migrator<'a>(&'a self, db: &'a Db) -> Box<dyn Migrator + 'a> {
        Box::new(ClickHouseMigrator::new(db, self))
    }

    fn default_value_of(&self, _field: &Field) -> Expr {
        Expr::raw("DEFAULT")
    }

    fn bind_var_to(&self, writer: &mut dyn SqlWriter, _position: usize, _value: &SqlValue) {
        writer.push_char('?');
    }

    fn quote_to(&self, writer: &mut dyn SqlWriter, identifier: &str) {
        writer.push_char('"');
        for (idx, segment) in identifier.split('.').enumerate() {
            if idx > 0 {
                writer.push_sql(".\"");
            }
            writer.push_sql(segment);
            writer.push_char('"');
        }
    }

    fn explain(&self, sql: &str, vars: &[SqlValue]) -> String {
        explain_sql(sql, Some(&*NUMERIC_PLACEHOLDER), "'", vars)
    }

    fn data_type_of(&self, field: &Field) -> String {
        types::data_type_of(field)
    }

    async fn save_point(&self, tx: &Db, name: &str) -> Result<()> {
        if let Err(e) = tx.exec(&format!("SAVEPOINT {name}"), &[]).await {
            debug!(savepoint = %name, error = %e, "SAVEPOINT failed, ignoring");
        }
        Ok(())
    }

    async fn rollback_to(&self, tx: &Db, name: &str) -> Result<()> {
        if let Err(e) = tx
            .exec(&format!("ROLLBACK TO SAVEPOINT {name}"), &[])
            .await
        {
            debug!(savepoint = %name, error = %e, "ROLLBACK TO SAVEPOINT failed, ignoring");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(identifier: &str) -> String {
        let mut out = String::new();
        ClickHouseDialect::open("").quote_to(&mut out, identifier);
        out
    }

    #[test]
    fn test_open_and_new() {
        let dialect = ClickHouseDialect::open("http://localhost:8123/default");
        assert_eq!(dialect.name(), "clickhouse");
        assert_eq!(dialect.config().driver_name, "clickhouse");
        assert_eq!(dialect.config().dsn, "http://localhost:8123/default");
        assert!(dialect.config().conn.is_none());

        let dialect = ClickHouseDialect::new(
            Config::new("tcp://db:9000")
                .driver_name("custom")
                .prefer_simple_protocol(true),
        );
        assert_eq!(dialect.name(), "clickhouse");
        assert_eq!(dialect.config().driver_name, "custom");
        assert!(dialect.config().prefer_simple_protocol);
    }

    #[test]
    fn test_quote_identifiers() {
        assert_eq!(quote("column"), "\"column\"");
        assert_eq!(quote("table.column"), "\"table\".\"column\"");
        assert_eq!(quote("db.table.column"), "\"db\".\"table\".\"column\"");
        assert_eq!(quote(""), "\"\"");
    }

    #[test]
    fn test_bind_var_is_question_mark() {
        let dialect = ClickHouseDialect::open("");
        let values = [
            SqlValue::Null,
            SqlValue::Int(-1),
            SqlValue::UInt(7),
            SqlValue::Text("$1 ? '".to_string()),
            SqlValue::Blob(vec![1, 2, 3]),
        ];
        for (idx, value) in values.iter().enumerate() {
            let mut out = String::new();
            dialect.bind_var_to(&mut out, idx + 1, value);
            assert_eq!(out, "?");
        }
    }

    #[test]
    fn test_default_value_is_keyword() {
        let dialect = ClickHouseDialect::open("");
        let field = Field::new("n", oxide_orm::DataType::Int).default_value("42");
        let expr = dialect.default_value_of(&field);
        assert_eq!(expr.sql, "DEFAULT");
        assert!(expr.vars.is_empty());
    }

    #[test]
    fn test_explain_numbered_placeholders() {
        let dialect = ClickHouseDialect::open("");
        assert_eq!(
            dialect.explain(
                "SELECT * FROM t WHERE a = $1",
                &[SqlValue::Text("x".to_string())]
            ),
            "SELECT * FROM t WHERE a = 'x'"
        );
        assert_eq!(
            dialect.explain(
                "SELECT * FROM t WHERE a = $1 AND b = $2",
                &[SqlValue::Int(3), SqlValue::Bool(false)]
            ),
            "SELECT * FROM t WHERE a = 3 AND b = false"
        );
    }
}
