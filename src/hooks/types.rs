//! Hook Types
//!
//! Core types for the hooks system: listener points, override slots, the
//! context handed to callbacks, and the callback traits themselves.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::features::FeatureStore;
use crate::grammar;
use crate::model::Services;
use crate::record::RecordState;
use crate::schema::ColumnInfo;
use crate::value::Value;

/// Lifecycle points where any number of listeners can add side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerPoint {
    /// Once per save, right after the transaction begins
    PostBeginStore,
    /// Before field validation
    PreValidate,
    /// After field validation; listeners append validation messages
    PostValidate,
}

impl ListenerPoint {
    /// Get all listener points, in the order they fire during a save
    pub fn all() -> &'static [ListenerPoint] {
        &[
            ListenerPoint::PostBeginStore,
            ListenerPoint::PreValidate,
            ListenerPoint::PostValidate,
        ]
    }

    /// Name the record base uses for this point
    pub fn hook_name(&self) -> &'static str {
        match self {
            ListenerPoint::PostBeginStore => "post-begin::store()",
            ListenerPoint::PreValidate => "pre::validate()",
            ListenerPoint::PostValidate => "post::validate()",
        }
    }
}

/// Per-column methods a single provider may take over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideSlot {
    Inspect,
    Prepare,
}

impl OverrideSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideSlot::Inspect => "inspect",
            OverrideSlot::Prepare => "prepare",
        }
    }

    /// Hook name of the slot for a column, e.g. `replace::inspectCreatedAt()`
    pub fn hook_name(&self, column: &str) -> String {
        format!(
            "replace::{}{}()",
            self.as_str(),
            grammar::camelize(column, true)
        )
    }
}

/// Read-only view of the model a callback runs against
pub struct ModelContext<'a> {
    pub class: &'a str,
    pub table: String,
    /// Whether the record is already persisted
    pub exists: bool,
    pub features: &'a FeatureStore,
    pub services: &'a Services,
    pub settings: &'a Settings,
    pub(crate) column_names: Option<&'a HashMap<String, String>>,
}

impl ModelContext<'_> {
    /// Human-readable column name for messages
    pub fn column_name(&self, column: &str) -> String {
        self.column_names
            .and_then(|names| names.get(column))
            .cloned()
            .unwrap_or_else(|| grammar::humanize(column))
    }
}

/// Callback attached to a [`ListenerPoint`]
#[async_trait]
pub trait Listener: Send + Sync {
    /// Identity used to deduplicate registrations
    fn name(&self) -> &str;

    /// Get a description of what this listener does
    fn description(&self) -> &str {
        "No description available"
    }

    async fn execute(&self, ctx: &ModelContext<'_>, state: &mut RecordState) -> Result<()>;
}

/// Replacement for a column's `inspect` method
pub trait InspectOverride: Send + Sync {
    fn name(&self) -> &str;

    fn inspect(&self, ctx: &ModelContext<'_>, column: &str) -> Result<ColumnInfo>;
}

/// Replacement for a column's `prepare` method
pub trait PrepareOverride: Send + Sync {
    fn name(&self) -> &str;

    fn prepare(&self, ctx: &ModelContext<'_>, column: &str, state: &RecordState) -> Result<Value>;
}

/// Overrides registered for a single column
#[derive(Clone, Default)]
pub struct ColumnCapabilities {
    pub inspect: Option<Arc<dyn InspectOverride>>,
    pub prepare: Option<Arc<dyn PrepareOverride>>,
}

impl ColumnCapabilities {
    pub fn provider(&self, slot: OverrideSlot) -> Option<&str> {
        match slot {
            OverrideSlot::Inspect => self.inspect.as_ref().map(|h| h.name()),
            OverrideSlot::Prepare => self.prepare.as_ref().map(|h| h.name()),
        }
    }
}

impl std::fmt::Debug for ColumnCapabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnCapabilities")
            .field("inspect", &self.provider(OverrideSlot::Inspect))
            .field("prepare", &self.provider(OverrideSlot::Prepare))
            .finish()
    }
}
