//! Action definition and result types.
//!
//! An action is the unit the model can invoke. The core treats the parameter
//! schema and the handler as opaque; only the name and description take part
//! in visibility filtering.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Action schema
// ─────────────────────────────────────────────────────────────────────────────

/// JSON Schema-compatible parameter definition for an action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionParameterSchema {
    /// Top-level JSON Schema type.
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property definitions (when type is `object`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Map<String, Value>>,
    /// Required property names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Description of the schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Catch-all for additional JSON Schema properties.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ActionParameterSchema {
    /// An empty `object` schema for actions that take no parameters.
    #[must_use]
    pub fn empty_object() -> Self {
        Self {
            schema_type: "object".into(),
            properties: None,
            required: None,
            description: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// An action definition as presented to the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Action name (unique identifier).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the action's parameters.
    pub parameters: ActionParameterSchema,
}

// ─────────────────────────────────────────────────────────────────────────────
// Action result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of an action invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    /// The action output text.
    pub content: String,
    /// Optional structured details (action-specific metadata).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Whether the invocation resulted in an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Create a simple text result.
#[must_use]
pub fn text_result(text: impl Into<String>) -> ActionResult {
    ActionResult {
        content: text.into(),
        details: None,
        is_error: None,
    }
}

/// Create an error result.
#[must_use]
pub fn error_result(message: impl Into<String>) -> ActionResult {
    ActionResult {
        content: message.into(),
        details: None,
        is_error: Some(true),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handler trait
// ─────────────────────────────────────────────────────────────────────────────

/// An invocable action exposed by a capability.
///
/// Implementations are registered inside a capability bundle and surface to
/// the model through the dynamic filter. The handler is opaque to the core:
/// filtering only ever reads [`CapabilityAction::name`] and
/// [`CapabilityAction::description`].
#[async_trait]
pub trait CapabilityAction: Send + Sync {
    /// Action name (unique within the visible set).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Full schema definition sent to the model.
    fn definition(&self) -> ActionSpec;

    /// Invoke the action with the given parameters.
    async fn invoke(&self, params: Value) -> Result<ActionResult>;
}
