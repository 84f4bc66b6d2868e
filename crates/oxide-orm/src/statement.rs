//! Statement rendering.

use crate::clause::{Expr, SqlWriter};
use crate::dialect::Dialector;
use crate::value::{SqlValue, ToSqlValue};

/// An SQL statement being rendered for one dialect.
///
/// Identifiers go through the dialect's quoting and every bound value gets
/// the dialect's placeholder, so the finished SQL and its values can be
/// handed straight to a connection pool.
#[derive(Debug)]
pub struct Statement<'a> {
    dialector: &'a dyn Dialector,
    sql: String,
    vars: Vec<SqlValue>,
}

impl<'a> Statement<'a> {
    /// Creates an empty statement.
    #[must_use]
    pub fn new(dialector: &'a dyn Dialector) -> Self {
        Self {
            dialector,
            sql: String::new(),
            vars: Vec::new(),
        }
    }

    /// Appends `value` as a bound variable.
    pub fn add_var(&mut self, value: impl ToSqlValue) {
        self.vars.push(value.to_sql_value());
        let position = self.vars.len();
        self.dialector
            .bind_var_to(&mut self.sql, position, &self.vars[position - 1]);
    }

    /// Appends a quoted identifier.
    pub fn write_quoted(&mut self, identifier: &str) {
        self.dialector.quote_to(&mut self.sql, identifier);
    }

    /// Appends a comma-separated, parenthesized list of quoted identifiers.
    pub fn write_quoted_list<S: AsRef<str>>(&mut self, identifiers: &[S]) {
        self.sql.push('(');
        for (idx, identifier) in identifiers.iter().enumerate() {
            if idx > 0 {
                self.sql.push(',');
            }
            self.write_quoted(identifier.as_ref());
        }
        self.sql.push(')');
    }

    /// Appends an expression, re-binding its `?` placeholders through the
    /// dialect.
    pub fn add_expr(&mut self, expr: Expr) {
        let mut vars = expr.vars.into_iter();
        for c in expr.sql.chars() {
            if c == '?' {
                if let Some(v) = vars.next() {
                    self.add_var(v);
                    continue;
                }
            }
            self.sql.push(c);
        }
    }

    /// Returns the SQL rendered so far.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the bound values.
    #[must_use]
    pub fn vars(&self) -> &[SqlValue] {
        &self.vars
    }

    /// Consumes the statement, returning its SQL and values.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.vars)
    }
}

impl SqlWriter for Statement<'_> {
    fn push_char(&mut self, c: char) {
        self.sql.push(c);
    }

    fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }
}
