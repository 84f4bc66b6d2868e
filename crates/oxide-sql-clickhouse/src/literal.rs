//! ClickHouse literals for client-side binding.
//!
//! Unlike the logging renderer, every value here round-trips: floats keep
//! their full precision, blobs are sent through `unhex`, and timestamps keep
//! their sub-second digits so they also parse into `DateTime64` columns.

use oxide_orm::{inline_positional, SqlValue};

/// Returns `sql` with each `?` outside quoted sections replaced by the
/// literal of the matching argument.
#[must_use]
pub fn bind(sql: &str, args: &[SqlValue]) -> String {
    let rendered: Vec<String> = args.iter().map(render).collect();
    inline_positional(sql, &rendered)
}

/// Renders `value` as a ClickHouse literal.
#[must_use]
pub fn render(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => String::from("NULL"),
        SqlValue::Bool(b) => b.to_string(),
        SqlValue::Int(n) => n.to_string(),
        SqlValue::UInt(n) => n.to_string(),
        SqlValue::Float(f) => float(*f),
        SqlValue::Text(s) => string(s),
        SqlValue::Blob(bytes) => {
            let hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
            format!("unhex('{hex}')")
        }
        SqlValue::Timestamp(ts) => string(&ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
    }
}

fn float(f: f64) -> String {
    if f.is_nan() {
        String::from("nan")
    } else if f.is_infinite() {
        String::from(if f > 0.0 { "inf" } else { "-inf" })
    } else {
        // Debug keeps the shortest representation that parses back exactly.
        format!("{f:?}")
    }
}

fn string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}
