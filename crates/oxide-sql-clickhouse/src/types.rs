//! Column types for abstract field types.

use oxide_orm::{DataType, Field};
use tracing::warn;

const AUTOINCREMENT: &str = " primary key autoincrement";

/// Returns the ClickHouse column type for `field`.
///
/// Integer widths are picked from the declared size with the thresholds
/// `< 16` and `< 31`. Types without a mapping are returned as their raw
/// tag and reported with a warning.
#[must_use]
pub fn data_type_of(field: &Field) -> String {
    match &field.data_type {
        DataType::Bool => "bool".to_string(),
        DataType::Uint => integer_type("UInt", field),
        DataType::Int => integer_type("Int", field),
        DataType::Float => "real".to_string(),
        DataType::String if field.size > 0 => format!("FixedString({})", field.size),
        DataType::String => "String".to_string(),
        DataType::Time => "datetime".to_string(),
        DataType::Bytes => "blob".to_string(),
        DataType::Custom(tag) => {
            warn!(field = %field.name, data_type = %tag, "Unmapped field data type");
            tag.clone()
        }
    }
}

fn integer_type(prefix: &str, field: &Field) -> String {
    let bits = match field.size {
        size if size < 16 => 8,
        size if size < 31 => 16,
        _ => 32,
    };
    let suffix = if field.auto_increment { AUTOINCREMENT } else { "" };
    format!("{prefix}{bits}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn sized(data_type: DataType, size: u32) -> Field {
        Field::new("f", data_type).size(size)
    }

    #[test]
    fn test_unsigned_thresholds() {
        for size in 0..16 {
            assert_eq!(data_type_of(&sized(DataType::Uint, size)), "UInt8");
        }
        for size in 16..31 {
            assert_eq!(data_type_of(&sized(DataType::Uint, size)), "UInt16");
        }
        for size in [31, 32, 64, 128] {
            assert_eq!(data_type_of(&sized(DataType::Uint, size)), "UInt32");
        }
    }

    #[test]
    fn test_signed_thresholds() {
        assert_eq!(data_type_of(&sized(DataType::Int, 0)), "Int8");
        assert_eq!(data_type_of(&sized(DataType::Int, 15)), "Int8");
        assert_eq!(data_type_of(&sized(DataType::Int, 16)), "Int16");
        assert_eq!(data_type_of(&sized(DataType::Int, 30)), "Int16");
        assert_eq!(data_type_of(&sized(DataType::Int, 31)), "Int32");
        assert_eq!(data_type_of(&sized(DataType::Int, 64)), "Int32");
    }

    #[test]
    fn test_autoincrement_suffix() {
        let cases = [
            (DataType::Uint, 8, "UInt8 primary key autoincrement"),
            (DataType::Uint, 16, "UInt16 primary key autoincrement"),
            (DataType::Uint, 32, "UInt32 primary key autoincrement"),
            (DataType::Int, 8, "Int8 primary key autoincrement"),
            (DataType::Int, 16, "Int16 primary key autoincrement"),
            (DataType::Int, 64, "Int32 primary key autoincrement"),
        ];
        for (data_type, size, expected) in cases {
            let field = sized(data_type, size).auto_increment();
            assert_eq!(data_type_of(&field), expected);
        }
    }

    #[test]
    fn test_autoincrement_ignored_for_non_integers() {
        let field = sized(DataType::String, 0).auto_increment();
        assert_eq!(data_type_of(&field), "String");
    }

    #[test]
    fn test_strings() {
        assert_eq!(data_type_of(&sized(DataType::String, 0)), "String");
        assert_eq!(data_type_of(&sized(DataType::String, 1)), "FixedString(1)");
        assert_eq!(
            data_type_of(&sized(DataType::String, 255)),
            "FixedString(255)"
        );
    }

    #[test]
    fn test_fixed_types() {
        assert_eq!(data_type_of(&sized(DataType::Bool, 0)), "bool");
        assert_eq!(data_type_of(&sized(DataType::Float, 64)), "real");
        assert_eq!(data_type_of(&sized(DataType::Time, 0)), "datetime");
        assert_eq!(data_type_of(&sized(DataType::Bytes, 0)), "blob");
    }

    #[test]
    fn test_deterministic() {
        let field = sized(DataType::Uint, 20).auto_increment();
        let before = field.clone();
        assert_eq!(data_type_of(&field), data_type_of(&field));
        assert_eq!(field, before);
    }

    #[test]
    #[traced_test]
    fn test_unmapped_type_passes_through() {
        let field = Field::new("status", "Enum8('a' = 1, 'b' = 2)");
        assert_eq!(data_type_of(&field), "Enum8('a' = 1, 'b' = 2)");
        assert!(logs_contain("Unmapped field data type"));
        assert!(logs_contain("status"));
    }
}
