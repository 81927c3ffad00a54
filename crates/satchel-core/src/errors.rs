//! Error types for the capability system.

use thiserror::Error;

/// Errors that can occur during capability operations.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// A bundle failed validation at registration time. Fatal to that single
    /// registration, never to the registry as a whole.
    #[error("invalid capability '{capability}': {message}")]
    Validation {
        /// Name of the offending capability (may be empty when the name
        /// itself is what failed validation).
        capability: String,
        /// Description of the validation failure.
        message: String,
    },

    /// Capability not found by name.
    #[error("capability not found: {0}")]
    NotFound(String),

    /// A capability directory could not be resolved to a bundle.
    #[error("failed to load capability from {path}: {message}")]
    Load {
        /// Path of the capability directory.
        path: String,
        /// Description of the load failure.
        message: String,
    },

    /// The capability is visible but the caller lacks a required permission.
    ///
    /// Defined as an extension point only; the core never raises it.
    #[error("permission denied for capability '{capability}': requires '{permission}'")]
    PermissionDenied {
        /// Name of the capability.
        capability: String,
        /// The missing permission.
        permission: String,
    },

    /// A capability with this name is already registered and the registry is
    /// configured to reject duplicates.
    #[error("capability already registered: {0}")]
    AlreadyRegistered(String),

    /// I/O error during filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CapabilityError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            capability: capability.into(),
            message: message.into(),
        }
    }

    /// Create a load error.
    #[must_use]
    pub fn load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for capability operations.
pub type Result<T> = std::result::Result<T, CapabilityError>;
