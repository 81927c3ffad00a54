//! Visibility reduction policies.
//!
//! A policy decides how a batch of newly loaded capability names combines
//! with the names already loaded in a session. The reducers are pure
//! functions over name lists so they can be reasoned about and tested in
//! isolation from any session plumbing.

use satchel_settings::{ReducerMode, SessionSettings};
use tracing::warn;

/// How newly loaded capability names combine with the current loaded set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityPolicy {
    /// The incoming batch replaces the loaded set entirely.
    Replace,
    /// The incoming batch is appended; nothing is ever evicted.
    Accumulate,
    /// A bounded window of at most `K` names.
    ///
    /// With an empty current set the first `K` incoming names win. With a
    /// non-empty current set the combined list is truncated to its last `K`
    /// entries, evicting the oldest. Re-loading an already loaded name does
    /// not refresh its position.
    BoundedFifo(usize),
}

impl VisibilityPolicy {
    /// Build a policy from the session settings section.
    #[must_use]
    pub fn from_settings(settings: &SessionSettings) -> Self {
        match settings.reducer_mode {
            ReducerMode::Replace => Self::Replace,
            ReducerMode::Accumulate => Self::Accumulate,
            ReducerMode::Fifo => {
                let k = if settings.max_loaded == 0 {
                    warn!("maxLoaded of 0 is not usable, falling back to 1");
                    1
                } else {
                    settings.max_loaded
                };
                Self::BoundedFifo(k)
            }
        }
    }

    /// Combine the current loaded set with an incoming batch.
    ///
    /// The result never contains duplicates; within the incoming batch the
    /// first occurrence of a name wins.
    #[must_use]
    pub fn apply(&self, current: &[String], incoming: &[String]) -> Vec<String> {
        let incoming = dedupe(incoming);
        match *self {
            Self::Replace => incoming,
            Self::Accumulate => {
                let mut combined = current.to_vec();
                for name in incoming {
                    if !combined.contains(&name) {
                        combined.push(name);
                    }
                }
                combined
            }
            Self::BoundedFifo(k) => {
                if current.is_empty() {
                    let mut batch = incoming;
                    batch.truncate(k);
                    return batch;
                }
                let mut combined = current.to_vec();
                for name in incoming {
                    if !combined.contains(&name) {
                        combined.push(name);
                    }
                }
                let evict = combined.len().saturating_sub(k);
                combined.split_off(evict)
            }
        }
    }
}

fn dedupe(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}
