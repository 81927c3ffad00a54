//! In-memory capability registry.
//!
//! Maintains a map of capability bundles keyed by name, plus a registration
//! order index: loader-action enumeration and search results follow
//! registration order, and an overwrite keeps the original position.
//!
//! Mutation (`register` / `unregister` / `enable` / `disable`) is a
//! setup-phase concern; once serving begins the registry is shared
//! read-only, so the read paths take `&self` and never lock.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use satchel_core::{CapabilityAction, CapabilityDescriptor, CapabilityError, Result, Visibility};
use satchel_settings::DuplicateMode;
use tracing::{debug, warn};

use crate::bundle::CapabilityBundle;

/// Predicate over a capability descriptor, used to filter listings.
pub type DescriptorPredicate = dyn Fn(&CapabilityDescriptor) -> bool + Send + Sync;

/// Central registry mapping capability names to their bundles.
pub struct CapabilityRegistry {
    bundles: HashMap<String, CapabilityBundle>,
    order: Vec<String>,
    on_duplicate: DuplicateMode,
}

impl CapabilityRegistry {
    /// Create an empty registry with the default duplicate policy
    /// (overwrite, warn).
    #[must_use]
    pub fn new() -> Self {
        Self {
            bundles: HashMap::new(),
            order: Vec::new(),
            on_duplicate: DuplicateMode::Overwrite,
        }
    }

    /// Set the duplicate registration policy.
    #[must_use]
    pub fn with_duplicate_mode(mut self, mode: DuplicateMode) -> Self {
        self.on_duplicate = mode;
        self
    }

    /// Register a bundle.
    ///
    /// Validates the bundle first. A duplicate name either overwrites the
    /// existing entry with a warning (keeping its registration position) or
    /// fails, per the configured [`DuplicateMode`].
    pub fn register(&mut self, bundle: CapabilityBundle) -> Result<()> {
        bundle.validate()?;
        let name = bundle.name().to_string();

        if self.bundles.contains_key(&name) {
            match self.on_duplicate {
                DuplicateMode::Reject => {
                    return Err(CapabilityError::AlreadyRegistered(name));
                }
                DuplicateMode::Overwrite => {
                    warn!(name = %name, "capability already registered, overwriting");
                }
            }
        } else {
            self.order.push(name.clone());
        }

        debug!(name = %name, version = %bundle.descriptor().version, "capability registered");
        let _ = self.bundles.insert(name, bundle);
        Ok(())
    }

    /// Remove a capability by name, returning it if it existed.
    ///
    /// Unknown names are a silent no-op.
    pub fn unregister(&mut self, name: &str) -> Option<CapabilityBundle> {
        let removed = self.bundles.remove(name);
        if removed.is_some() {
            self.order.retain(|n| n != name);
            debug!(name = %name, "capability unregistered");
        }
        removed
    }

    /// Look up a bundle by name.
    pub fn get(&self, name: &str) -> Result<&CapabilityBundle> {
        self.bundles
            .get(name)
            .ok_or_else(|| CapabilityError::NotFound(name.to_string()))
    }

    /// Whether a capability with the given name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bundles.contains_key(name)
    }

    /// Number of registered capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// All capability names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Capability names whose descriptor matches the predicate, in
    /// registration order. `None` matches everything.
    #[must_use]
    pub fn list(&self, filter: Option<&DescriptorPredicate>) -> Vec<String> {
        self.ordered_bundles()
            .filter(|b| filter.is_none_or(|f| f(b.descriptor())))
            .map(|b| b.name().to_string())
            .collect()
    }

    /// Enable a capability. Returns `false` for unknown names.
    pub fn enable(&mut self, name: &str) -> bool {
        self.set_enabled(name, true)
    }

    /// Disable a capability. Its actions and loader disappear from
    /// visibility computations until re-enabled. Returns `false` for
    /// unknown names.
    pub fn disable(&mut self, name: &str) -> bool {
        self.set_enabled(name, false)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        if let Some(bundle) = self.bundles.get_mut(name) {
            bundle.set_enabled(enabled);
            true
        } else {
            false
        }
    }

    /// Loader actions of enabled capabilities matching the predicate, in
    /// registration order.
    ///
    /// Loader actions are always part of the visible set regardless of
    /// session state — they are how the model loads a capability.
    #[must_use]
    pub fn loader_actions(
        &self,
        filter: Option<&DescriptorPredicate>,
    ) -> Vec<Arc<dyn CapabilityAction>> {
        self.ordered_bundles()
            .filter(|b| b.descriptor().enabled)
            .filter(|b| filter.is_none_or(|f| f(b.descriptor())))
            .filter_map(CapabilityBundle::loader_action)
            .collect()
    }

    /// The full visible action set for the given loaded capability names:
    /// every loader action, followed by the actions of each loaded
    /// capability in the order given.
    ///
    /// This path is total: unknown, disabled, or repeated names are silently
    /// skipped, never an error.
    #[must_use]
    pub fn actions_for_loaded(&self, loaded: &[String]) -> Vec<Arc<dyn CapabilityAction>> {
        let mut actions = self.loader_actions(None);
        let mut seen: HashSet<&str> = HashSet::new();

        for name in loaded {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match self.bundles.get(name) {
                Some(bundle) if bundle.descriptor().enabled => {
                    actions.extend(bundle.actions().iter().cloned());
                }
                Some(_) => debug!(name = %name, "loaded capability is disabled, skipping"),
                None => debug!(name = %name, "loaded capability not in registry, skipping"),
            }
        }

        actions
    }

    /// Search descriptors by free-text query, tags, and visibility.
    ///
    /// A descriptor matches when the query is empty or a case-insensitive
    /// substring of its name or description, its tag set intersects the
    /// requested tags (or none were requested), and its visibility equals
    /// the requested one (or none was requested). Results follow
    /// registration order.
    #[must_use]
    pub fn search(
        &self,
        query: &str,
        tags: &[String],
        visibility: Option<Visibility>,
    ) -> Vec<CapabilityDescriptor> {
        let query = query.to_lowercase();
        self.ordered_bundles()
            .map(CapabilityBundle::descriptor)
            .filter(|d| {
                query.is_empty()
                    || d.name.to_lowercase().contains(&query)
                    || d.description.to_lowercase().contains(&query)
            })
            .filter(|d| tags.is_empty() || tags.iter().any(|t| d.has_tag(t)))
            .filter(|d| visibility.is_none_or(|v| d.visibility == v))
            .cloned()
            .collect()
    }

    fn ordered_bundles(&self) -> impl Iterator<Item = &CapabilityBundle> {
        self.order.iter().filter_map(|name| self.bundles.get(name))
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a visibility allow-list predicate for use with
/// [`CapabilityRegistry::list`] and [`CapabilityRegistry::loader_actions`].
#[must_use]
pub fn visibility_filter(
    allowed: Vec<Visibility>,
) -> impl Fn(&CapabilityDescriptor) -> bool + Send + Sync {
    move |descriptor| allowed.contains(&descriptor.visibility)
}
