//! Per-session record of loaded capabilities.

use tracing::debug;

use crate::reducer::VisibilityPolicy;

/// The names of capabilities a session has loaded, in load order.
///
/// This is the only session-scoped state the visibility machinery needs.
/// It says nothing about which actions exist; the registry answers that at
/// filter time, so unregistered or disabled names sitting in here are
/// harmless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    loaded: Vec<String>,
}

impl SessionState {
    /// Create an empty session state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently loaded capability names, in load order.
    #[must_use]
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    /// Whether the named capability is currently loaded.
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.iter().any(|n| n == name)
    }

    /// Number of loaded capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Whether no capability is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    /// Fold a batch of newly loaded names into the state under the given
    /// policy.
    pub fn apply(&mut self, policy: &VisibilityPolicy, incoming: &[String]) {
        self.loaded = policy.apply(&self.loaded, incoming);
        debug!(loaded = ?self.loaded, "session loaded set updated");
    }

    /// Drop every loaded capability.
    pub fn clear(&mut self) {
        self.loaded.clear();
    }
}
