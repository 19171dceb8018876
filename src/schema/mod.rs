//! Schema Introspection
//!
//! Column metadata and unique keys for the tables records map to. The
//! registry reads schema information through [`SchemaService`]; [`Schema`]
//! is an immutable snapshot that can be built by hand or introspected from
//! SQLite.

pub mod sqlite;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::SchemaError;

/// Semantic column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Varchar,
    Char,
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Time,
    Timestamp,
    Blob,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Varchar => "varchar",
            DataType::Char => "char",
            DataType::Text => "text",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::Timestamp => "timestamp",
            DataType::Blob => "blob",
        }
    }

    /// Maps a declared SQL type such as `VARCHAR(255)` or `DATETIME` to a
    /// data type and, for character types, its maximum length.
    pub fn from_declared(declared: &str) -> (DataType, Option<u32>) {
        let declared = declared.trim().to_ascii_lowercase();
        let (base, args) = match declared.find('(') {
            Some(idx) => (
                declared[..idx].trim(),
                Some(declared[idx + 1..].trim_end_matches(')').trim()),
            ),
            None => (declared.as_str(), None),
        };
        let length = args.and_then(|a| a.split(',').next()?.trim().parse().ok());

        let data_type = match base {
            "varchar" | "character varying" | "nvarchar" | "varchar2" => DataType::Varchar,
            "char" | "character" | "nchar" => DataType::Char,
            "date" => DataType::Date,
            "time" => DataType::Time,
            "timestamp" | "datetime" => DataType::Timestamp,
            "bool" | "boolean" => DataType::Boolean,
            "blob" | "" => DataType::Blob,
            b if b.contains("int") => DataType::Integer,
            b if b.contains("char") || b.contains("clob") || b.contains("text") => DataType::Text,
            b if b.contains("real")
                || b.contains("floa")
                || b.contains("doub")
                || b.contains("dec")
                || b.contains("numeric") =>
            {
                DataType::Float
            }
            _ => DataType::Text,
        };

        let length = match data_type {
            DataType::Varchar | DataType::Char => length,
            _ => None,
        };
        (data_type, length)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature tag overlaid on base column metadata by the inspector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureTag {
    #[serde(rename = "date created")]
    DateCreated,
    #[serde(rename = "date updated")]
    DateUpdated,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "link")]
    Link,
    #[serde(rename = "random")]
    Random,
}

impl FeatureTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureTag::DateCreated => "date created",
            FeatureTag::DateUpdated => "date updated",
            FeatureTag::Email => "email",
            FeatureTag::Link => "link",
            FeatureTag::Random => "random",
        }
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub valid_values: Option<Vec<String>>,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub decimal_places: Option<u32>,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<FeatureTag>,
}

impl ColumnInfo {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            not_null: false,
            default: None,
            valid_values: None,
            max_length: None,
            decimal_places: None,
            auto_increment: false,
            feature: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn with_max_length(mut self, length: u32) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    /// Looks up a single metadata element by its serialized key
    /// (`type`, `not_null`, `feature`, ...). Absent or null elements
    /// yield `None`.
    pub fn element(&self, name: &str) -> Option<serde_json::Value> {
        let value = serde_json::to_value(self).ok()?;
        match value.get(name) {
            Some(serde_json::Value::Null) | None => None,
            Some(element) => Some(element.clone()),
        }
    }
}

/// Read access to table metadata
pub trait SchemaService: Send + Sync {
    fn column_info(&self, table: &str, column: &str) -> Result<ColumnInfo, SchemaError>;

    /// Unique keys of a table, each as the list of columns it spans
    fn unique_keys(&self, table: &str) -> Result<Vec<Vec<String>>, SchemaError>;
}

/// Columns and unique keys of one table
#[derive(Debug, Clone, Default)]
pub struct TableSchema {
    pub name: String,
    /// Column names in declaration order
    pub column_order: Vec<String>,
    pub columns: HashMap<String, ColumnInfo>,
    pub unique_keys: Vec<Vec<String>>,
}

impl TableSchema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn column(mut self, name: &str, info: ColumnInfo) -> Self {
        if !self.columns.contains_key(name) {
            self.column_order.push(name.to_string());
        }
        self.columns.insert(name.to_string(), info);
        self
    }

    pub fn unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_keys
            .push(columns.into_iter().map(Into::into).collect());
        self
    }
}

/// Immutable schema snapshot
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: HashMap<String, TableSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: TableSchema) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    pub fn get_table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn require_table(&self, table: &str) -> Result<&TableSchema, SchemaError> {
        self.tables
            .get(table)
            .ok_or_else(|| SchemaError::UnknownTable(table.to_string()))
    }
}

impl SchemaService for Schema {
    fn column_info(&self, table: &str, column: &str) -> Result<ColumnInfo, SchemaError> {
        self.require_table(table)?
            .columns
            .get(column)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            })
    }

    fn unique_keys(&self, table: &str) -> Result<Vec<Vec<String>>, SchemaError> {
        Ok(self.require_table(table)?.unique_keys.clone())
    }
}
