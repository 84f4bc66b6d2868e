//! Statement-generation callbacks.
//!
//! Each processor lists the callbacks run for one kind of statement and the
//! clauses, in order, its statements are built from. Dialects install the
//! defaults from `initialize` and choose whether mutations get `RETURNING`.

use tracing::debug;

use crate::db::Db;

/// Options for [`register_default_callbacks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallbackConfig {
    /// Append `RETURNING` to INSERT, UPDATE and DELETE statements.
    pub with_returning: bool,
}

/// Callbacks and clause order for one kind of statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Processor {
    /// Registered callback names, in execution order.
    pub callbacks: Vec<&'static str>,
    /// Clause keywords, in rendering order.
    pub clauses: Vec<&'static str>,
}

impl Processor {
    fn new(callbacks: &[&'static str], clauses: &[&'static str]) -> Self {
        Self {
            callbacks: callbacks.to_vec(),
            clauses: clauses.to_vec(),
        }
    }

    /// Returns whether `clause` is part of this processor's statements.
    #[must_use]
    pub fn has_clause(&self, clause: &str) -> bool {
        self.clauses.iter().any(|c| *c == clause)
    }

    /// Returns whether a callback named `name` is registered.
    #[must_use]
    pub fn has_callback(&self, name: &str) -> bool {
        self.callbacks.iter().any(|c| *c == name)
    }
}

/// All processors of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Callbacks {
    /// INSERT.
    pub create: Processor,
    /// SELECT.
    pub query: Processor,
    /// UPDATE.
    pub update: Processor,
    /// DELETE.
    pub delete: Processor,
    /// Row-returning raw queries.
    pub row: Processor,
    /// Raw statements.
    pub raw: Processor,
}

impl Callbacks {
    /// Returns whether any callbacks have been registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        !self.create.callbacks.is_empty()
    }
}

const CREATE_CLAUSES: &[&str] = &["INSERT", "VALUES", "ON CONFLICT"];
const QUERY_CLAUSES: &[&str] = &["SELECT", "FROM", "WHERE", "GROUP BY", "ORDER BY", "LIMIT", "FOR"];
const UPDATE_CLAUSES: &[&str] = &["UPDATE", "SET", "WHERE"];
const DELETE_CLAUSES: &[&str] = &["DELETE", "FROM", "WHERE"];

/// Installs the default processors on `db`.
pub fn register_default_callbacks(db: &mut Db, config: &CallbackConfig) {
    let mut callbacks = Callbacks {
        create: Processor::new(
            &[
                "begin_transaction",
                "before_create",
                "save_before_associations",
                "create",
                "save_after_associations",
                "after_create",
                "commit_or_rollback_transaction",
            ],
            CREATE_CLAUSES,
        ),
        query: Processor::new(&["query", "preload", "after_query"], QUERY_CLAUSES),
        update: Processor::new(
            &[
                "begin_transaction",
                "setup_reflect_value",
                "before_update",
                "save_before_associations",
                "update",
                "save_after_associations",
                "after_update",
                "commit_or_rollback_transaction",
            ],
            UPDATE_CLAUSES,
        ),
        delete: Processor::new(
            &[
                "begin_transaction",
                "before_delete",
                "delete_before_associations",
                "delete",
                "after_delete",
                "commit_or_rollback_transaction",
            ],
            DELETE_CLAUSES,
        ),
        row: Processor::new(&["row"], &[]),
        raw: Processor::new(&["raw"], &[]),
    };

    if config.with_returning {
        callbacks.create.clauses.push("RETURNING");
        callbacks.update.clauses.push("RETURNING");
        callbacks.delete.clauses.push("RETURNING");
    }

    debug!(
        dialect = db.dialector().name(),
        with_returning = config.with_returning,
        "Registering default callbacks"
    );
    db.set_callbacks(callbacks);
}

#[cfg(test)]
mod tests {
    use crate::testing::dry_run_db;

    #[tokio::test]
    async fn test_default_callbacks_without_returning() {
        let (db, _) = dry_run_db(false).await;
        let callbacks = db.callbacks();

        assert!(callbacks.is_registered());
        assert!(callbacks.create.has_callback("create"));
        assert!(callbacks.query.has_clause("GROUP BY"));
        assert!(!callbacks.create.has_clause("RETURNING"));
        assert!(!callbacks.update.has_clause("RETURNING"));
    }

    #[tokio::test]
    async fn test_default_callbacks_with_returning() {
        let (db, _) = dry_run_db(true).await;
        let callbacks = db.callbacks();

        assert_eq!(
            callbacks.create.clauses,
            vec!["INSERT", "VALUES", "ON CONFLICT", "RETURNING"]
        );
        assert!(callbacks.update.has_clause("RETURNING"));
        assert!(callbacks.delete.has_clause("RETURNING"));
        assert!(!callbacks.query.has_clause("RETURNING"));
    }
}
