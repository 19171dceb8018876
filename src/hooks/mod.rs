//! Hooks System
//!
//! Extension points fired by the record lifecycle. Listeners attach side
//! effects to a [`ListenerPoint`]; overrides replace a single column's
//! inspect or prepare method. Feature modules register both without the
//! record base knowing about any specific feature.

pub mod registry;
pub mod types;

pub use registry::HookRegistry;
pub use types::{
    ColumnCapabilities, InspectOverride, Listener, ListenerPoint, ModelContext, OverrideSlot,
    PrepareOverride,
};
