//! oxide-clickhouse CLI
//!
//! Command-line tool for migrating ClickHouse schemas and previewing SQL.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_orm::{
    explain_sql, Db, Dialector, DriverRegistry, DryRunPool, Schema, SqlValue, ToSqlValue,
};
use oxide_sql_clickhouse::{driver, ClickHouseDialect, Config};

/// ClickHouse schema migrations for oxide-orm.
#[derive(Parser)]
#[command(name = "oxide-clickhouse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// ClickHouse DSN.
    #[arg(
        short,
        long,
        env = "CLICKHOUSE_DSN",
        default_value = "http://localhost:8123/default"
    )]
    dsn: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing tables, columns and indexes.
    Migrate {
        /// JSON file holding an array of table schemas.
        #[arg(short, long)]
        schema: PathBuf,

        /// Print the statements without executing them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print SQL with its values inlined.
    Explain {
        /// SQL with `?` or `$n` placeholders.
        sql: String,

        /// Values, in placeholder order.
        values: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Migrate { schema, dry_run } => {
            let text = std::fs::read_to_string(&schema)
                .with_context(|| format!("Failed to read {}", schema.display()))?;
            let schemas: Vec<Schema> = serde_json::from_str(&text)
                .with_context(|| format!("Invalid schema file {}", schema.display()))?;

            if dry_run {
                info!("Dry run mode - SQL will be printed but not executed.");
                let pool = Arc::new(DryRunPool::new());
                let dialect = ClickHouseDialect::new(Config::new(&cli.dsn).conn(pool.clone()));
                let db = Db::open(Arc::new(dialect), Arc::new(DriverRegistry::new())).await?;
                db.auto_migrate(&schemas).await?;

                for sql in pool.sql() {
                    println!("{sql};");
                }
            } else {
                let mut drivers = DriverRegistry::new();
                driver::register(&mut drivers);
                let dialect = ClickHouseDialect::open(&cli.dsn);
                let db = Db::open(Arc::new(dialect), Arc::new(drivers))
                    .await
                    .context("Failed to open ClickHouse session")?;
                db.auto_migrate(&schemas).await?;
                info!("Migrated {} table(s).", schemas.len());
            }
        }

        Commands::Explain { sql, values } => {
            let values: Vec<SqlValue> = values.iter().map(|v| parse_value(v)).collect();
            println!("{}", explain(&sql, &values));
        }
    }

    Ok(())
}

/// Inlines `values` into `sql`, using `?` placeholders when present.
fn explain(sql: &str, values: &[SqlValue]) -> String {
    if sql.contains('?') {
        explain_sql(sql, None, "'", values)
    } else {
        ClickHouseDialect::open("").explain(sql, values)
    }
}

/// Reads a command line value as NULL, a boolean, a number or text.
fn parse_value(raw: &str) -> SqlValue {
    match raw {
        "NULL" | "null" => None::<i64>.to_sql_value(),
        "true" => true.to_sql_value(),
        "false" => false.to_sql_value(),
        _ => raw
            .parse::<i64>()
            .map(ToSqlValue::to_sql_value)
            .or_else(|_| raw.parse::<f64>().map(ToSqlValue::to_sql_value))
            .unwrap_or_else(|_| raw.to_sql_value()),
    }
}
