//! Capability bundles.
//!
//! A [`CapabilityBundle`] owns one descriptor, the ordered actions the
//! capability contributes once loaded, exactly one loader action that is
//! always visible, and lazily resolved usage instructions.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use satchel_core::constants::MAX_INSTRUCTIONS_FILE_SIZE;
use satchel_core::{
    ActionParameterSchema, ActionResult, ActionSpec, CapabilityAction, CapabilityDescriptor,
    CapabilityError, Result,
};
use serde_json::Value;
use tracing::warn;

// ─────────────────────────────────────────────────────────────────────────────
// Instructions
// ─────────────────────────────────────────────────────────────────────────────

/// Lazily resolved usage instructions for a capability.
///
/// Resolution order: the optional on-disk instructions file (read once, on
/// first access), falling back to text generated from the descriptor and
/// action specs. An unreadable or oversized file logs a warning and falls
/// back; it never fails.
#[derive(Debug)]
pub struct Instructions {
    source: Option<PathBuf>,
    fallback: String,
    cell: OnceLock<String>,
}

impl Instructions {
    fn new(source: Option<PathBuf>, fallback: String) -> Self {
        Self {
            source,
            fallback,
            cell: OnceLock::new(),
        }
    }

    /// Resolve the instructions text, reading the source file on first call.
    pub fn resolve(&self) -> &str {
        self.cell.get_or_init(|| {
            let Some(path) = &self.source else {
                return self.fallback.clone();
            };
            match std::fs::metadata(path) {
                Ok(meta) if meta.len() > MAX_INSTRUCTIONS_FILE_SIZE => {
                    warn!(
                        path = %path.display(),
                        size = meta.len(),
                        "instructions file too large, using generated instructions"
                    );
                    self.fallback.clone()
                }
                Ok(_) => match std::fs::read_to_string(path) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to read instructions file");
                        self.fallback.clone()
                    }
                },
                Err(_) => self.fallback.clone(),
            }
        })
    }
}

/// Generate fallback instructions from a descriptor and its action specs.
///
/// Used when a capability ships no `instructions.md` of its own.
#[must_use]
pub fn generate_instructions(descriptor: &CapabilityDescriptor, specs: &[ActionSpec]) -> String {
    let action_lines: Vec<String> = specs
        .iter()
        .map(|s| format!("- {}: {}", s.name, s.description))
        .collect();
    let mut text = format!(
        "{}\n\nAvailable actions:\n{}\n",
        descriptor.description,
        action_lines.join("\n")
    );
    if !descriptor.tags.is_empty() {
        text.push_str(&format!(
            "\nUse these actions to accomplish tasks related to: {}\n",
            descriptor.tags.join(", ")
        ));
    }
    text
}

// ─────────────────────────────────────────────────────────────────────────────
// Loader action
// ─────────────────────────────────────────────────────────────────────────────

/// Default loader action for a capability.
///
/// Always visible to the model. Invoking it returns the capability's
/// instructions and echoes the capability name in `details` — the signal the
/// host folds into session state through the reducer. The invocation itself
/// never mutates session state.
struct LoaderAction {
    action_name: String,
    description: String,
    capability: String,
    instructions: Arc<Instructions>,
}

#[async_trait]
impl CapabilityAction for LoaderAction {
    fn name(&self) -> &str {
        &self.action_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn definition(&self) -> ActionSpec {
        ActionSpec {
            name: self.action_name.clone(),
            description: self.description.clone(),
            parameters: ActionParameterSchema::empty_object(),
        }
    }

    async fn invoke(&self, _params: Value) -> Result<ActionResult> {
        Ok(ActionResult {
            content: self.instructions.resolve().to_string(),
            details: Some(serde_json::json!({ "capability": self.capability })),
            is_error: None,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bundle
// ─────────────────────────────────────────────────────────────────────────────

/// One capability: descriptor, actions, loader action, and instructions.
///
/// Bundles are assembled with the builder methods, validated at registration,
/// and immutable afterwards except for the descriptor's `enabled` flag.
pub struct CapabilityBundle {
    descriptor: CapabilityDescriptor,
    actions: Vec<Arc<dyn CapabilityAction>>,
    custom_loader: Option<Arc<dyn CapabilityAction>>,
    use_default_loader: bool,
    instructions_path: Option<PathBuf>,
    instructions: OnceLock<Arc<Instructions>>,
    default_loader: OnceLock<Arc<dyn CapabilityAction>>,
}

impl CapabilityBundle {
    /// Create a bundle for the given descriptor with no actions yet.
    #[must_use]
    pub fn new(descriptor: CapabilityDescriptor) -> Self {
        Self {
            descriptor,
            actions: Vec::new(),
            custom_loader: None,
            use_default_loader: false,
            instructions_path: None,
            instructions: OnceLock::new(),
            default_loader: OnceLock::new(),
        }
    }

    /// Add an action. Actions keep their insertion order.
    #[must_use]
    pub fn with_action(mut self, action: Arc<dyn CapabilityAction>) -> Self {
        self.actions.push(action);
        self
    }

    /// Set a custom loader action.
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<dyn CapabilityAction>) -> Self {
        self.custom_loader = Some(loader);
        self
    }

    /// Use the standard loader action (`load_<name>`), built from the final
    /// descriptor, action list, and instructions on first access.
    #[must_use]
    pub fn with_default_loader(mut self) -> Self {
        self.use_default_loader = true;
        self
    }

    /// Set the path of the optional instructions file.
    #[must_use]
    pub fn with_instructions_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.instructions_path = Some(path.into());
        self
    }

    /// The bundle's descriptor.
    pub fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    /// The capability name (registry key).
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Flip the descriptor's `enabled` flag — the only mutation a registered
    /// bundle supports.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.descriptor.enabled = enabled;
    }

    /// The capability's actions, in insertion order.
    pub fn actions(&self) -> &[Arc<dyn CapabilityAction>] {
        &self.actions
    }

    /// The loader action, if one is configured.
    pub fn loader_action(&self) -> Option<Arc<dyn CapabilityAction>> {
        if let Some(loader) = &self.custom_loader {
            return Some(Arc::clone(loader));
        }
        if !self.use_default_loader {
            return None;
        }
        let loader = self.default_loader.get_or_init(|| {
            Arc::new(LoaderAction {
                action_name: format!("load_{}", self.descriptor.name),
                description: format!(
                    "Load the '{}' capability: {}",
                    self.descriptor.name, self.descriptor.description
                ),
                capability: self.descriptor.name.clone(),
                instructions: self.instructions_handle(),
            })
        });
        Some(Arc::clone(loader))
    }

    /// The capability's instructions, resolved lazily.
    pub fn instructions(&self) -> &str {
        self.instructions_handle_ref().resolve()
    }

    fn instructions_handle(&self) -> Arc<Instructions> {
        Arc::clone(self.instructions_handle_ref())
    }

    fn instructions_handle_ref(&self) -> &Arc<Instructions> {
        self.instructions.get_or_init(|| {
            let specs: Vec<ActionSpec> = self.actions.iter().map(|a| a.definition()).collect();
            Arc::new(Instructions::new(
                self.instructions_path.clone(),
                generate_instructions(&self.descriptor, &specs),
            ))
        })
    }

    /// Validate the bundle for registration.
    ///
    /// Requires a non-empty name, a non-empty description, at least one
    /// action, and a loader action.
    pub fn validate(&self) -> Result<()> {
        if self.descriptor.name.is_empty() {
            return Err(CapabilityError::validation("", "name cannot be empty"));
        }
        if self.descriptor.description.is_empty() {
            return Err(CapabilityError::validation(
                &self.descriptor.name,
                "description cannot be empty",
            ));
        }
        if self.actions.is_empty() {
            return Err(CapabilityError::validation(
                &self.descriptor.name,
                "capability must provide at least one action",
            ));
        }
        if self.loader_action().is_none() {
            return Err(CapabilityError::validation(
                &self.descriptor.name,
                "capability must provide a loader action",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for CapabilityBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityBundle")
            .field("name", &self.descriptor.name)
            .field("version", &self.descriptor.version)
            .field("actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use satchel_core::text_result;

    use super::*;

    struct StubAction {
        action_name: String,
    }

    impl StubAction {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                action_name: name.to_string(),
            })
        }
    }

    #[async_trait]
    impl CapabilityAction for StubAction {
        fn name(&self) -> &str {
            &self.action_name
        }

        fn description(&self) -> &str {
            "stub action"
        }

        fn definition(&self) -> ActionSpec {
            ActionSpec {
                name: self.action_name.clone(),
                description: "stub action".to_string(),
                parameters: ActionParameterSchema::empty_object(),
            }
        }

        async fn invoke(&self, _params: Value) -> Result<ActionResult> {
            Ok(text_result("ok"))
        }
    }

    fn pdf_bundle() -> CapabilityBundle {
        CapabilityBundle::new(
            CapabilityDescriptor::new("pdf", "PDF processing").with_tag("documents"),
        )
        .with_action(StubAction::new("extract_text"))
        .with_action(StubAction::new("merge_pdfs"))
        .with_default_loader()
    }

    #[test]
    fn valid_bundle_passes_validation() {
        assert!(pdf_bundle().validate().is_ok());
    }

    #[test]
    fn empty_name_fails_validation() {
        let bundle = CapabilityBundle::new(CapabilityDescriptor::new("", "desc"))
            .with_action(StubAction::new("a"))
            .with_default_loader();
        assert_matches!(
            bundle.validate(),
            Err(CapabilityError::Validation { .. })
        );
    }

    #[test]
    fn empty_description_fails_validation() {
        let bundle = CapabilityBundle::new(CapabilityDescriptor::new("x", ""))
            .with_action(StubAction::new("a"))
            .with_default_loader();
        assert_matches!(
            bundle.validate(),
            Err(CapabilityError::Validation { .. })
        );
    }

    #[test]
    fn no_actions_fails_validation() {
        let bundle =
            CapabilityBundle::new(CapabilityDescriptor::new("x", "desc")).with_default_loader();
        assert_matches!(
            bundle.validate(),
            Err(CapabilityError::Validation { .. })
        );
    }

    #[test]
    fn missing_loader_fails_validation() {
        let bundle = CapabilityBundle::new(CapabilityDescriptor::new("x", "desc"))
            .with_action(StubAction::new("a"));
        assert_matches!(
            bundle.validate(),
            Err(CapabilityError::Validation { .. })
        );
    }

    #[test]
    fn default_loader_name_and_schema() {
        let bundle = pdf_bundle();
        let loader = bundle.loader_action().unwrap();
        assert_eq!(loader.name(), "load_pdf");
        assert!(loader.description().contains("PDF processing"));
        assert_eq!(loader.definition().parameters.schema_type, "object");
    }

    #[test]
    fn custom_loader_wins() {
        let bundle = CapabilityBundle::new(CapabilityDescriptor::new("x", "desc"))
            .with_action(StubAction::new("a"))
            .with_loader(StubAction::new("activate_x"));
        assert_eq!(bundle.loader_action().unwrap().name(), "activate_x");
    }

    #[tokio::test]
    async fn default_loader_returns_instructions_and_signal() {
        let bundle = pdf_bundle();
        let loader = bundle.loader_action().unwrap();
        let result = loader.invoke(Value::Null).await.unwrap();
        assert!(result.content.contains("PDF processing"));
        assert!(result.content.contains("extract_text"));
        assert_eq!(result.details.unwrap()["capability"], "pdf");
        assert!(result.is_error.is_none());
    }

    #[test]
    fn generated_instructions_list_actions_and_tags() {
        let bundle = pdf_bundle();
        let text = bundle.instructions();
        assert!(text.contains("- extract_text: stub action"));
        assert!(text.contains("- merge_pdfs: stub action"));
        assert!(text.contains("documents"));
    }

    #[test]
    fn instructions_file_wins_over_generated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("instructions.md");
        std::fs::write(&path, "# Custom instructions\nUse carefully.").unwrap();

        let bundle = pdf_bundle().with_instructions_file(&path);
        assert!(bundle.instructions().starts_with("# Custom instructions"));
    }

    #[test]
    fn missing_instructions_file_falls_back() {
        let bundle = pdf_bundle().with_instructions_file("/nonexistent/instructions.md");
        assert!(bundle.instructions().contains("Available actions:"));
    }

    #[test]
    fn oversized_instructions_file_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("instructions.md");
        let big = "x".repeat(usize::try_from(MAX_INSTRUCTIONS_FILE_SIZE).unwrap() + 1);
        std::fs::write(&path, big).unwrap();

        let bundle = pdf_bundle().with_instructions_file(&path);
        assert!(bundle.instructions().contains("Available actions:"));
    }

    #[test]
    fn instructions_file_read_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("instructions.md");
        std::fs::write(&path, "first").unwrap();

        let bundle = pdf_bundle().with_instructions_file(&path);
        assert_eq!(bundle.instructions(), "first");

        std::fs::write(&path, "second").unwrap();
        assert_eq!(bundle.instructions(), "first");
    }

    #[test]
    fn set_enabled_flips_flag() {
        let mut bundle = pdf_bundle();
        assert!(bundle.descriptor().enabled);
        bundle.set_enabled(false);
        assert!(!bundle.descriptor().enabled);
    }
}
