//! In-memory state of a single record instance.
//!
//! Feature callbacks never own this state; they receive it by mutable
//! reference from the registry while a lifecycle operation runs.

use std::collections::HashMap;

use crate::value::Value;

/// What a record remembers about a column before a callback rewrote it
#[derive(Debug, Clone, PartialEq)]
pub enum OldValue {
    /// The single value the column held before it was overwritten
    Single(Value),
    /// Every value the column has held, oldest first
    History(Vec<Value>),
}

impl OldValue {
    /// Appends to the history, turning a single prior value into a
    /// one-entry history first.
    pub fn push(&mut self, value: Value) {
        match self {
            OldValue::History(values) => values.push(value),
            OldValue::Single(prior) => {
                let prior = std::mem::replace(prior, Value::Null);
                *self = OldValue::History(vec![prior, value]);
            }
        }
    }

    pub fn latest(&self) -> &Value {
        match self {
            OldValue::Single(value) => value,
            OldValue::History(values) => values.last().unwrap_or(&Value::Null),
        }
    }
}

/// Values, prior values, related records and validation messages of a record
#[derive(Debug, Clone, Default)]
pub struct RecordState {
    pub values: HashMap<String, Value>,
    pub old_values: HashMap<String, OldValue>,
    /// Related records keyed by relationship route, in whatever shape the
    /// record base caches them.
    pub related_records: HashMap<String, serde_json::Value>,
    pub validation_messages: Vec<String>,
}

impl RecordState {
    /// Current value of a column, `Null` when it was never set
    pub fn value(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&Value::Null)
    }

    pub fn set(&mut self, column: &str, value: impl Into<Value>) {
        self.values.insert(column.to_string(), value.into());
    }

    /// Replaces the column's old value with its current one
    pub fn remember(&mut self, column: &str) {
        let current = self.value(column).clone();
        self.old_values
            .insert(column.to_string(), OldValue::Single(current));
    }

    /// Appends the column's current value to its old-value history
    pub fn remember_history(&mut self, column: &str) {
        let current = self.value(column).clone();
        self.old_values
            .entry(column.to_string())
            .or_insert_with(|| OldValue::History(Vec::new()))
            .push(current);
    }
}

/// A record instance of a configured class
#[derive(Debug, Clone)]
pub struct Record {
    pub class: String,
    exists: bool,
    pub state: RecordState,
}

impl Record {
    /// A new, insert-pending record
    pub fn new(class: &str) -> Self {
        Self {
            class: class.to_string(),
            exists: false,
            state: RecordState::default(),
        }
    }

    /// A record that is already persisted
    pub fn existing(class: &str) -> Self {
        Self {
            exists: true,
            ..Self::new(class)
        }
    }

    pub fn with_value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.state.set(column, value);
        self
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn value(&self, column: &str) -> &Value {
        self.state.value(column)
    }
}
