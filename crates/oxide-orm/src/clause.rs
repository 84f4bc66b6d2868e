//! SQL fragments and the writers they are rendered into.

use crate::value::SqlValue;

/// A sink for rendered SQL.
///
/// Dialects write identifiers and placeholders through this trait so the
/// same rendering code can target a plain `String` or a [`Statement`]
/// that is still collecting bound values.
///
/// [`Statement`]: crate::Statement
pub trait SqlWriter {
    /// Appends a single character.
    fn push_char(&mut self, c: char);

    /// Appends a string slice.
    fn push_sql(&mut self, sql: &str);
}

impl SqlWriter for String {
    fn push_char(&mut self, c: char) {
        self.push(c);
    }

    fn push_sql(&mut self, sql: &str) {
        self.push_str(sql);
    }
}

/// A raw SQL expression with its own bound values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    /// SQL text, possibly containing `?` placeholders.
    pub sql: String,
    /// Values for the placeholders in `sql`, in order.
    pub vars: Vec<SqlValue>,
}

impl Expr {
    /// Creates an expression with no bound values.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            vars: Vec::new(),
        }
    }

    /// Creates an expression with bound values.
    #[must_use]
    pub fn with_vars(sql: impl Into<String>, vars: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            vars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_writer() {
        let mut out = String::new();
        out.push_char('"');
        out.push_sql("users");
        out.push_char('"');
        assert_eq!(out, "\"users\"");
    }

    #[test]
    fn test_expr_raw() {
        let expr = Expr::raw("DEFAULT");
        assert_eq!(expr.sql, "DEFAULT");
        assert!(expr.vars.is_empty());
    }
}
