//! Drivers and the registry that names them.
//!
//! Drivers are registered explicitly on a [`DriverRegistry`] before a
//! session is opened; a dialect looks its driver up by name when it has to
//! open its own connection pool.

pub mod sqlite;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{OrmError, Result};
use crate::pool::ConnPool;

/// Opens connection pools from a data source name.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Opens a pool for `dsn`.
    async fn open(&self, dsn: &str) -> Result<Arc<dyn ConnPool>>;
}

/// Maps driver names to drivers.
#[derive(Default, Clone)]
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl DriverRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `driver` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, driver: Arc<dyn Driver>) {
        let name = name.into();
        debug!(driver = %name, "Registering driver");
        self.drivers.insert(name, driver);
    }

    /// Returns the driver registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.get(name).cloned()
    }

    /// Returns whether a driver is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Opens a pool through the driver registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::UnknownDriver`] if nothing is registered under
    /// `name`, otherwise whatever the driver's `open` returns.
    pub async fn open(&self, name: &str, dsn: &str) -> Result<Arc<dyn ConnPool>> {
        let driver = self
            .get(name)
            .ok_or_else(|| OrmError::UnknownDriver(name.to_string()))?;
        driver.open(dsn).await
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.drivers.keys().collect();
        names.sort();
        f.debug_struct("DriverRegistry")
            .field("drivers", &names)
            .finish()
    }
}
