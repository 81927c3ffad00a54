//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` with `#[serde(default)]`
//! so partial JSON files are valid — missing fields get their compiled
//! default during deserialization.

use satchel_core::Visibility;
use satchel_core::constants::DEFAULT_ENTRY_POINT;
use serde::{Deserialize, Serialize};

/// Root settings type for the Satchel capability system.
///
/// Loaded from `~/.satchel/settings.json` with defaults applied for missing
/// fields. `SATCHEL_*` environment variables can override specific values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SatchelSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Capability discovery settings.
    pub discovery: DiscoverySettings,
    /// Per-conversation session settings.
    pub session: SessionSettings,
    /// Registry behavior settings.
    pub registry: RegistrySettings,
}

impl Default for SatchelSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "satchel".to_string(),
            discovery: DiscoverySettings::default(),
            session: SessionSettings::default(),
            registry: RegistrySettings::default(),
        }
    }
}

/// Filesystem discovery configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoverySettings {
    /// Whether to scan the capabilities directory at startup.
    pub auto_discover: bool,
    /// Root directory containing one subdirectory per capability.
    pub root_dir: String,
    /// Entry-point module name a subdirectory must contain to count as a
    /// capability (file stem, any extension).
    pub entry_point: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            auto_discover: true,
            root_dir: "./capabilities".to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}

/// How the session visibility reducer combines prior and incoming names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducerMode {
    /// Each turn's incoming names replace the previous state.
    #[default]
    Replace,
    /// Names accumulate for the whole conversation (unbounded growth).
    Accumulate,
    /// At most `maxLoaded` names, oldest-loaded evicted first.
    Fifo,
}

/// Per-conversation session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Reducer policy selector.
    pub reducer_mode: ReducerMode,
    /// Maximum concurrently loaded capabilities (fifo mode only).
    pub max_loaded: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            reducer_mode: ReducerMode::Replace,
            max_loaded: 3,
        }
    }
}

/// Behavior when a capability name is registered twice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateMode {
    /// Last write wins; the overwrite is logged as a warning.
    #[default]
    Overwrite,
    /// The second registration fails.
    Reject,
}

/// Registry behavior configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrySettings {
    /// Duplicate registration policy.
    pub on_duplicate: DuplicateMode,
    /// Whether listings and loader actions are filtered by visibility.
    pub filter_by_visibility: bool,
    /// Visibility levels exposed when filtering is on.
    pub allowed_visibilities: Vec<Visibility>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            on_duplicate: DuplicateMode::Overwrite,
            filter_by_visibility: true,
            allowed_visibilities: vec![Visibility::Public],
        }
    }
}
