//! Column values and the conversions applied to them before they are stored.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::schema::{DataType, SchemaService};

/// Format used for every auto-populated timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single column value held by a record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// Whether the value counts as empty for display purposes
    /// (null, false, zero, `""` and `"0"`).
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Integer(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Text(s) => s.is_empty() || s == "0",
            Value::Date(_) | Value::Time(_) | Value::Timestamp(_) => false,
        }
    }

    /// Whether the value is something a format validator should look at:
    /// non-blank text, a number (zero included) or a date/time object.
    pub fn is_stringlike(&self) -> bool {
        match self {
            Value::Text(s) => !s.trim().is_empty(),
            Value::Integer(_) | Value::Float(_) => !self.to_string().trim().is_empty(),
            Value::Date(_) | Value::Time(_) | Value::Timestamp(_) => true,
            Value::Null | Value::Bool(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", if *b { "1" } else { "0" }),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Converts raw scalars into the semantic type a column declares
pub trait Objectifier: Send + Sync {
    fn objectify(&self, table: &str, column: &str, raw: &str) -> Value;
}

/// Objectifier driven by the declared column types of a schema
pub struct SchemaObjectifier {
    schema: Arc<dyn SchemaService>,
}

impl SchemaObjectifier {
    pub fn new(schema: Arc<dyn SchemaService>) -> Self {
        Self { schema }
    }
}

impl Objectifier for SchemaObjectifier {
    fn objectify(&self, table: &str, column: &str, raw: &str) -> Value {
        let data_type = match self.schema.column_info(table, column) {
            Ok(info) => info.data_type,
            Err(_) => return Value::text(raw),
        };
        objectify_as(data_type, raw)
    }
}

/// Parses `raw` as the given column type, falling back to text when the
/// input does not fit the type.
pub fn objectify_as(data_type: DataType, raw: &str) -> Value {
    let parsed = match data_type {
        DataType::Timestamp => parse_timestamp(raw).map(Value::Timestamp),
        DataType::Date => parse_timestamp(raw)
            .map(|ts| ts.date())
            .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
            .map(Value::Date),
        DataType::Time => parse_timestamp(raw)
            .map(|ts| ts.time())
            .or_else(|| NaiveTime::parse_from_str(raw, "%H:%M:%S").ok())
            .map(Value::Time),
        DataType::Integer => raw.trim().parse().ok().map(Value::Integer),
        DataType::Float => raw.trim().parse().ok().map(Value::Float),
        DataType::Boolean => match raw.trim() {
            "1" | "true" | "t" => Some(Value::Bool(true)),
            "0" | "false" | "f" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    };
    parsed.unwrap_or_else(|| Value::text(raw))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that always reports the same instant
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
