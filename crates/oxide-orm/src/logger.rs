//! Rendering statements with their values inlined, for logs.
//!
//! [`inline_positional`] is the placeholder scanner shared with drivers that
//! bind on the client side; those render their values losslessly themselves.

use regex::{Captures, Regex};

use crate::value::SqlValue;

/// Renders `sql` with `vars` substituted for its placeholders.
///
/// With `numeric_placeholder` set, every match of the regex is replaced by
/// the value its first capture group points to (1-based); placeholders
/// without a matching value are left as written. Without it, each `?`
/// outside a quoted literal is replaced by the next value in order.
///
/// String-like values are wrapped in `escaper`; backslashes and the escaper
/// itself are backslash-escaped inside them.
#[must_use]
pub fn explain_sql(
    sql: &str,
    numeric_placeholder: Option<&Regex>,
    escaper: &str,
    vars: &[SqlValue],
) -> String {
    let rendered: Vec<String> = vars.iter().map(|v| render_value(v, escaper)).collect();

    match numeric_placeholder {
        Some(re) => re
            .replace_all(sql, |caps: &Captures<'_>| {
                caps.get(1)
                    .and_then(|m| m.as_str().parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|idx| rendered.get(idx))
                    .map_or_else(|| caps[0].to_string(), Clone::clone)
            })
            .into_owned(),
        None => inline_positional(sql, &rendered),
    }
}

/// Replaces each `?` outside quoted literals and identifiers with the next
/// entry of `rendered`.
///
/// `'...'`, `"..."` and backtick sections are copied as is, honouring
/// backslash escapes inside them. Surplus placeholders are left as written.
#[must_use]
pub fn inline_positional<S: AsRef<str>>(sql: &str, rendered: &[S]) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut values = rendered.iter();
    let mut quote: Option<char> = None;
    let mut chars = sql.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        match quote {
            Some(_) if c == '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if matches!(c, '\'' | '"' | '`') => quote = Some(c),
            None if c == '?' => {
                if let Some(value) = values.next() {
                    out.pop();
                    out.push_str(value.as_ref());
                }
            }
            None => {}
        }
    }
    out
}

fn render_value(value: &SqlValue, escaper: &str) -> String {
    match value {
        SqlValue::Null => String::from("NULL"),
        SqlValue::Bool(b) => b.to_string(),
        SqlValue::Int(n) => n.to_string(),
        SqlValue::UInt(n) => n.to_string(),
        SqlValue::Float(f) => format!("{f}"),
        SqlValue::Text(s) => quote(s, escaper),
        SqlValue::Timestamp(ts) => {
            quote(&ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), escaper)
        }
        SqlValue::Blob(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) if is_printable(s) => quote(s, escaper),
            _ => format!("{escaper}<binary>{escaper}"),
        },
    }
}

fn quote(s: &str, escaper: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace(escaper, &format!("\\{escaper}"));
    format!("{escaper}{escaped}{escaper}")
}

fn is_printable(s: &str) -> bool {
    s.chars().all(|c| !c.is_control() || c.is_whitespace())
}
