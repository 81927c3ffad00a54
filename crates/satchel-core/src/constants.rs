//! Package-level constants.

/// Current version of the Satchel workspace (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "satchel";

/// Default entry-point module name checked during capability discovery.
///
/// A subdirectory of the discovery root is treated as a capability only if
/// it contains a file whose stem equals this name (any extension).
pub const DEFAULT_ENTRY_POINT: &str = "skill";

/// File name of the optional per-capability instructions document.
pub const INSTRUCTIONS_FILENAME: &str = "instructions.md";

/// Maximum size of an instructions file, in bytes. Larger files are ignored
/// in favor of generated instructions.
pub const MAX_INSTRUCTIONS_FILE_SIZE: u64 = 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3, "VERSION must be semver (MAJOR.MINOR.PATCH)");
        for part in parts {
            let _: u32 = part.parse().expect("each semver segment must be a number");
        }
    }

    #[test]
    fn name_is_lowercase() {
        assert_eq!(NAME, NAME.to_lowercase());
    }

    #[test]
    fn entry_point_has_no_extension() {
        assert!(!DEFAULT_ENTRY_POINT.contains('.'));
    }
}
