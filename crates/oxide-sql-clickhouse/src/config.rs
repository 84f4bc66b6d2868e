//! Dialect configuration.

use std::sync::Arc;

use oxide_orm::ConnPool;

/// Name the ClickHouse driver is registered under.
pub const DRIVER_NAME: &str = "clickhouse";

/// Configuration of a [`ClickHouseDialect`](crate::ClickHouseDialect).
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Driver used to open the pool when `conn` is not set.
    pub driver_name: String,
    /// Data source name handed to the driver.
    pub dsn: String,
    /// Carried for callers that select a protocol variant; the HTTP driver
    /// always sends plain text statements.
    pub prefer_simple_protocol: bool,
    /// Pre-opened pool, adopted as is by `initialize`.
    pub conn: Option<Arc<dyn ConnPool>>,
}

impl Config {
    /// Creates a configuration using the ClickHouse driver for `dsn`.
    #[must_use]
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            driver_name: DRIVER_NAME.to_string(),
            dsn: dsn.into(),
            ..Self::default()
        }
    }

    /// Sets the driver name.
    #[must_use]
    pub fn driver_name(mut self, name: impl Into<String>) -> Self {
        self.driver_name = name.into();
        self
    }

    /// Sets the protocol preference flag.
    #[must_use]
    pub const fn prefer_simple_protocol(mut self, prefer: bool) -> Self {
        self.prefer_simple_protocol = prefer;
        self
    }

    /// Sets a pre-opened connection pool.
    #[must_use]
    pub fn conn(mut self, conn: Arc<dyn ConnPool>) -> Self {
        self.conn = Some(conn);
        self
    }
}
