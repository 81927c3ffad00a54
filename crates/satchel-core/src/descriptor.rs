//! Capability descriptor metadata.
//!
//! A [`CapabilityDescriptor`] is the immutable identity card of a capability:
//! name, description, version, tags, visibility, and informational dependency
//! and permission lists. Only the `enabled` flag may change after
//! registration.

use serde::{Deserialize, Serialize};

/// Visibility level of a capability.
///
/// Controls which capabilities are exposed through listing and discovery
/// filters. The level itself carries no enforcement; hosts build predicates
/// from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to every consumer.
    #[default]
    Public,
    /// Visible inside the owning deployment only.
    Internal,
    /// Hidden from listings unless explicitly requested.
    Private,
}

/// Immutable metadata describing one capability.
///
/// Created at registration or discovery time. The descriptor participates in
/// listing, search, and visibility filtering; everything else about a
/// capability (its actions, its instructions) lives on the bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    /// Unique capability name (registry key).
    pub name: String,
    /// Human-readable description of what the capability does.
    pub description: String,
    /// Capability version string.
    pub version: String,
    /// Tags used for search and classification.
    pub tags: Vec<String>,
    /// Visibility level.
    pub visibility: Visibility,
    /// Names of capabilities or libraries this one depends on (informational).
    pub dependencies: Vec<String>,
    /// Permissions required to invoke this capability (informational; see the
    /// permission stage extension point in `satchel-session`).
    pub required_permissions: Vec<String>,
    /// Capability author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Whether the capability is currently enabled.
    pub enabled: bool,
}

impl CapabilityDescriptor {
    /// Create a descriptor with the given name and description.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: "1.0.0".to_string(),
            tags: Vec::new(),
            visibility: Visibility::Public,
            dependencies: Vec::new(),
            required_permissions: Vec::new(),
            author: None,
            enabled: true,
        }
    }

    /// Set the version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the visibility level.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Add an informational dependency.
    #[must_use]
    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    /// Add a required permission.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.required_permissions.push(permission.into());
        self
    }

    /// Set the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Mark the capability disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether this descriptor carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
