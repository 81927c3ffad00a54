//! Filesystem discovery of capability bundles.
//!
//! Scans the immediate children of a root directory. A child directory
//! participates when it contains an entry-point file (any extension) whose
//! stem matches the configured entry-point name. How such a directory
//! becomes a [`CapabilityBundle`] is up to the host's [`CapabilityLoader`].

use std::path::Path;

use satchel_core::Result;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::bundle::CapabilityBundle;
use crate::registry::CapabilityRegistry;

/// Turns a discovered capability directory into a bundle.
///
/// Implementations typically read a manifest from the entry-point file and
/// wire up the host's action implementations.
pub trait CapabilityLoader: Send + Sync {
    /// Build a bundle from the given capability directory.
    fn load(&self, dir: &Path) -> Result<CapabilityBundle>;
}

impl CapabilityRegistry {
    /// Discover capability directories under `root` and register every
    /// bundle the loader produces.
    ///
    /// Returns the number of capabilities registered. A missing root, an
    /// unloadable directory, or a bundle that fails registration is logged
    /// and skipped rather than aborting the scan.
    pub fn discover_from(
        &mut self,
        root: &Path,
        entry_point: &str,
        loader: &dyn CapabilityLoader,
    ) -> usize {
        if !root.is_dir() {
            warn!(root = %root.display(), "capability directory does not exist, skipping discovery");
            return 0;
        }

        let mut registered = 0;
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_dir())
        {
            let dir = entry.path();
            if !has_entry_point(dir, entry_point) {
                debug!(dir = %dir.display(), "no entry point file, skipping");
                continue;
            }

            match loader.load(dir) {
                Ok(bundle) => {
                    let name = bundle.name().to_string();
                    match self.register(bundle) {
                        Ok(()) => {
                            info!(name = %name, dir = %dir.display(), "discovered capability");
                            registered += 1;
                        }
                        Err(err) => {
                            warn!(name = %name, error = %err, "failed to register discovered capability");
                        }
                    }
                }
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "failed to load capability");
                }
            }
        }

        registered
    }
}

fn has_entry_point(dir: &Path, entry_point: &str) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries
        .filter_map(std::result::Result::ok)
        .filter(|e| e.path().is_file())
        .any(|e| {
            e.path()
                .file_stem()
                .is_some_and(|stem| stem == entry_point)
        })
}
