//! Hook Registry
//!
//! Manages registration and dispatch of listeners and per-column overrides.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::types::{
    ColumnCapabilities, InspectOverride, Listener, ListenerPoint, ModelContext, OverrideSlot,
    PrepareOverride,
};
use crate::error::{HookError, Result};
use crate::record::RecordState;

/// Registered listeners and overrides, keyed by class
///
/// Listeners run in registration order and are deduplicated by name.
/// Each column has at most one provider per [`OverrideSlot`].
#[derive(Default)]
pub struct HookRegistry {
    listeners: HashMap<(String, ListenerPoint), Vec<Arc<dyn Listener>>>,
    overrides: HashMap<String, HashMap<String, ColumnCapabilities>>,
}

impl HookRegistry {
    /// Create a registry with no hooks
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Returns `false` if a listener with the same name
    /// was already registered for this class and point.
    pub fn add_listener(
        &mut self,
        class: &str,
        point: ListenerPoint,
        listener: Arc<dyn Listener>,
    ) -> bool {
        if self.has_listener(class, point, listener.name()) {
            return false;
        }
        debug!(
            "Registering {} on {} for {}",
            listener.name(),
            point.hook_name(),
            class
        );
        self.listeners
            .entry((class.to_string(), point))
            .or_default()
            .push(listener);
        true
    }

    /// Check if a listener is registered for a class and point
    pub fn has_listener(&self, class: &str, point: ListenerPoint, name: &str) -> bool {
        self.listeners(class, point).iter().any(|l| l.name() == name)
    }

    /// Listeners for a class and point, in registration order
    pub fn listeners(&self, class: &str, point: ListenerPoint) -> &[Arc<dyn Listener>] {
        self.listeners
            .get(&(class.to_string(), point))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Install the inspect override for a column
    pub fn set_inspect_override(
        &mut self,
        class: &str,
        column: &str,
        handler: Arc<dyn InspectOverride>,
    ) -> std::result::Result<(), HookError> {
        let capabilities = self.capabilities_mut(class, column);
        if claim_slot(capabilities, OverrideSlot::Inspect, handler.name(), class, column)? {
            debug!("Registering {} as {}", handler.name(), OverrideSlot::Inspect.hook_name(column));
            capabilities.inspect = Some(handler);
        }
        Ok(())
    }

    /// Install the prepare override for a column
    pub fn set_prepare_override(
        &mut self,
        class: &str,
        column: &str,
        handler: Arc<dyn PrepareOverride>,
    ) -> std::result::Result<(), HookError> {
        let capabilities = self.capabilities_mut(class, column);
        if claim_slot(capabilities, OverrideSlot::Prepare, handler.name(), class, column)? {
            debug!("Registering {} as {}", handler.name(), OverrideSlot::Prepare.hook_name(column));
            capabilities.prepare = Some(handler);
        }
        Ok(())
    }

    /// Fails if `provider` could not take the slot without replacing
    /// another provider. Registers nothing.
    pub fn check_override(
        &self,
        class: &str,
        column: &str,
        slot: OverrideSlot,
        provider: &str,
    ) -> std::result::Result<(), HookError> {
        match self.capabilities(class, column) {
            Some(capabilities) => {
                claim_slot(capabilities, slot, provider, class, column).map(|_| ())
            }
            None => Ok(()),
        }
    }

    /// Overrides registered for a column, if any
    pub fn capabilities(&self, class: &str, column: &str) -> Option<&ColumnCapabilities> {
        self.overrides.get(class)?.get(column)
    }

    fn capabilities_mut(&mut self, class: &str, column: &str) -> &mut ColumnCapabilities {
        self.overrides
            .entry(class.to_string())
            .or_default()
            .entry(column.to_string())
            .or_default()
    }

    /// Run every listener registered for the context's class at `point`.
    /// The first listener error stops the chain and is returned.
    pub async fn run_listeners(
        &self,
        point: ListenerPoint,
        ctx: &ModelContext<'_>,
        state: &mut RecordState,
    ) -> Result<()> {
        for listener in self.listeners(ctx.class, point) {
            debug!(
                "Running {} on {} for {}",
                listener.name(),
                point.hook_name(),
                ctx.class
            );
            listener.execute(ctx, state).await?;
        }
        Ok(())
    }

    /// Human-readable list of every hook registered for a class
    pub fn describe(&self, class: &str) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(columns) = self.overrides.get(class) {
            let mut names: Vec<&String> = columns.keys().collect();
            names.sort();
            for column in names {
                let capabilities = &columns[column];
                for slot in [OverrideSlot::Inspect, OverrideSlot::Prepare] {
                    if let Some(provider) = capabilities.provider(slot) {
                        lines.push(format!("{} -> {}", slot.hook_name(column), provider));
                    }
                }
            }
        }

        for point in ListenerPoint::all() {
            for listener in self.listeners(class, *point) {
                lines.push(format!("{} -> {}", point.hook_name(), listener.name()));
            }
        }

        lines
    }
}

/// Decides whether `requested` may take the slot. Re-registering the
/// current provider is a no-op; a different provider is a conflict.
fn claim_slot(
    capabilities: &ColumnCapabilities,
    slot: OverrideSlot,
    requested: &str,
    class: &str,
    column: &str,
) -> std::result::Result<bool, HookError> {
    match capabilities.provider(slot) {
        None => Ok(true),
        Some(existing) if existing == requested => Ok(false),
        Some(existing) => Err(HookError::OverrideConflict {
            class: class.to_string(),
            column: column.to_string(),
            slot: slot.as_str(),
            existing: existing.to_string(),
            requested: requested.to_string(),
        }),
    }
}
