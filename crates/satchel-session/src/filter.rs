//! Per-model-call action filter.
//!
//! Before each model call the host asks the filter for the visible action
//! set: every enabled capability's loader action plus the actions of
//! whatever the session has loaded, optionally narrowed by secondary
//! stages. The filter is total — it never errors, and a name in session
//! state that the registry no longer knows is simply skipped.

use std::sync::Arc;

use satchel_core::{ActionSpec, CapabilityAction, TracingSink, VisibilityEvent, VisibilitySink};
use satchel_registry::CapabilityRegistry;

use crate::state::SessionState;

/// A secondary narrowing pass over the visible action set.
///
/// Stages run after the loaded-set computation and can only remove
/// actions, never add them. Typical uses are permission checks or
/// per-call allow-lists.
pub trait VisibilityStage: Send + Sync {
    /// Whether the action stays in the visible set.
    fn allows(&self, spec: &ActionSpec) -> bool;
}

/// Computes the visible action set for a model call.
pub struct DynamicFilter {
    sink: Arc<dyn VisibilitySink>,
    stages: Vec<Box<dyn VisibilityStage>>,
}

impl DynamicFilter {
    /// Create a filter that reports visibility decisions through tracing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: Arc::new(TracingSink),
            stages: Vec::new(),
        }
    }

    /// Replace the observability sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn VisibilitySink>) -> Self {
        self.sink = sink;
        self
    }

    /// Append a narrowing stage. Stages run in the order added.
    #[must_use]
    pub fn with_stage(mut self, stage: Box<dyn VisibilityStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// The actions visible for this model call.
    ///
    /// Loader actions of every enabled capability come first, then the
    /// actions of each loaded capability in load order, then each stage
    /// narrows the result. One [`VisibilityEvent`] is emitted per call.
    #[must_use]
    pub fn visible_actions(
        &self,
        state: &SessionState,
        registry: &CapabilityRegistry,
    ) -> Vec<Arc<dyn CapabilityAction>> {
        let mut actions = registry.actions_for_loaded(state.loaded());

        for stage in &self.stages {
            actions.retain(|action| stage.allows(&action.definition()));
        }

        self.sink.emit(&VisibilityEvent {
            loaded_names: state.loaded().to_vec(),
            visible_action_names: actions.iter().map(|a| a.name().to_string()).collect(),
        });

        actions
    }
}

impl Default for DynamicFilter {
    fn default() -> Self {
        Self::new()
    }
}
