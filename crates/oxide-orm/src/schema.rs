//! Schema descriptors.
//!
//! These types describe a model's table as the ORM sees it: abstract field
//! types, sizes and flags. Dialects read them to decide which concrete SQL
//! type to emit; they never modify them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Abstract field type, independent of any database.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    /// Boolean.
    Bool,
    /// Unsigned integer.
    Uint,
    /// Signed integer.
    Int,
    /// Floating point.
    Float,
    /// Character string.
    String,
    /// Date and time.
    Time,
    /// Byte sequence.
    Bytes,
    /// Any other type, carried as its raw tag.
    Custom(String),
}

impl DataType {
    /// Returns the tag string for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::Uint => "uint",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Time => "time",
            Self::Bytes => "bytes",
            Self::Custom(tag) => tag,
        }
    }
}

impl From<String> for DataType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "bool" => Self::Bool,
            "uint" => Self::Uint,
            "int" => Self::Int,
            "float" => Self::Float,
            "string" => Self::String,
            "time" => Self::Time,
            "bytes" => Self::Bytes,
            _ => Self::Custom(tag),
        }
    }
}

impl From<&str> for DataType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single column of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Abstract type.
    pub data_type: DataType,
    /// Declared size: bits for numbers, characters for strings, 0 if unset.
    #[serde(default)]
    pub size: u32,
    /// Whether the database generates the value.
    #[serde(default)]
    pub auto_increment: bool,
    /// Whether the column is part of the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether the column is NOT NULL.
    #[serde(default)]
    pub not_null: bool,
    /// Whether the column carries a UNIQUE constraint.
    #[serde(default)]
    pub unique: bool,
    /// Declared default value, as SQL text.
    #[serde(default)]
    pub default_value: Option<String>,
}

impl Field {
    /// Creates a field with the given name and type and no flags set.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<DataType>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            size: 0,
            auto_increment: false,
            primary_key: false,
            not_null: false,
            unique: false,
            default_value: None,
        }
    }

    /// Sets the declared size.
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Marks the field as auto-incrementing.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the field as part of the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the field as NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks the field as UNIQUE.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets a default value (SQL text).
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Returns whether a usable default is declared.
    ///
    /// `(-)` is the conventional marker for "no default" and is ignored.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default_value
            .as_deref()
            .is_some_and(|v| !v.is_empty() && v != "(-)")
    }
}

/// An index over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed column names, in order.
    pub fields: Vec<String>,
    /// Index class written before `INDEX`, e.g. `UNIQUE`.
    #[serde(default)]
    pub class: Option<String>,
    /// Index method written after `USING`.
    #[serde(default)]
    pub index_type: Option<String>,
}

impl Index {
    /// Creates an index over the given columns.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            class: None,
            index_type: None,
        }
    }

    /// Sets the index class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Sets the index method.
    #[must_use]
    pub fn index_type(mut self, index_type: impl Into<String>) -> Self {
        self.index_type = Some(index_type.into());
        self
    }
}

/// A model's table description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Table name.
    pub table: String,
    /// Columns, in declaration order.
    pub fields: Vec<Field>,
    /// Secondary indexes.
    #[serde(default)]
    pub indexes: Vec<Index>,
    /// Text appended after the closing parenthesis of `CREATE TABLE`.
    #[serde(default)]
    pub table_options: Option<String>,
}

impl Schema {
    /// Creates an empty schema for the given table.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            indexes: Vec::new(),
            table_options: None,
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Sets the table options.
    #[must_use]
    pub fn table_options(mut self, options: impl Into<String>) -> Self {
        self.table_options = Some(options.into());
        self
    }

    /// Looks up a field by column name.
    #[must_use]
    pub fn lookup_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the primary key fields.
    pub fn primary_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.primary_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_tags() {
        assert_eq!(DataType::from("uint"), DataType::Uint);
        assert_eq!(DataType::from("bytes"), DataType::Bytes);
        assert_eq!(
            DataType::from("Decimal(10, 2)"),
            DataType::Custom("Decimal(10, 2)".to_string())
        );
        assert_eq!(DataType::Custom("uuid".to_string()).as_str(), "uuid");
        assert_eq!(String::from(DataType::Time), "time");
    }

    #[test]
    fn test_has_default() {
        assert!(!Field::new("a", DataType::Int).has_default());
        assert!(!Field::new("a", DataType::Int).default_value("(-)").has_default());
        assert!(Field::new("a", DataType::Int).default_value("0").has_default());
    }

    #[test]
    fn test_schema_from_json() {
        let json = r#"{
            "table": "events",
            "fields": [
                {"name": "id", "data_type": "uint", "size": 32, "auto_increment": true, "primary_key": true},
                {"name": "payload", "data_type": "Map(String, String)"}
            ],
            "table_options": "ENGINE = MergeTree() ORDER BY id"
        }"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.table, "events");
        assert_eq!(schema.fields[0].data_type, DataType::Uint);
        assert!(schema.fields[0].auto_increment);
        assert_eq!(
            schema.fields[1].data_type,
            DataType::Custom("Map(String, String)".to_string())
        );
        assert_eq!(schema.primary_fields().count(), 1);
        assert!(schema.indexes.is_empty());
    }
}
