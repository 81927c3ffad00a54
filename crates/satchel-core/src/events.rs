//! Observability events for visibility computation.
//!
//! Every dynamic-filter pass emits one [`VisibilityEvent`] to an injected
//! [`VisibilitySink`] before the visible set is handed to the model call.
//! The event is trace-only: sinks must never influence the computed result.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Snapshot of one visibility computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityEvent {
    /// Capability names loaded in the session, in load order.
    pub loaded_names: Vec<String>,
    /// Names of the actions visible to the model, in presentation order.
    pub visible_action_names: Vec<String>,
}

/// Consumer of visibility events.
///
/// Injected into the dynamic filter instead of a process-wide logger so hosts
/// can route events to tracing, a metrics pipeline, or a test recorder.
pub trait VisibilitySink: Send + Sync {
    /// Receive one event. Must not fail and must not feed back into
    /// visibility computation.
    fn emit(&self, event: &VisibilityEvent);
}

/// Default sink that logs events through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl VisibilitySink for TracingSink {
    fn emit(&self, event: &VisibilityEvent) {
        debug!(
            loaded = ?event.loaded_names,
            visible = ?event.visible_action_names,
            "visible action set computed"
        );
    }
}

/// Sink that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl VisibilitySink for NullSink {
    fn emit(&self, _event: &VisibilityEvent) {}
}
