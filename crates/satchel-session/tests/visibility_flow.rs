//! End-to-end visibility flow: register bundles, load capabilities under
//! different policies, and check the action set each model call would see.

#![allow(missing_docs, unused_results)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use satchel_core::{
    ActionParameterSchema, ActionResult, ActionSpec, CapabilityAction, CapabilityDescriptor,
    Result, VisibilityEvent, VisibilitySink, text_result,
};
use satchel_registry::{CapabilityBundle, CapabilityRegistry};
use satchel_session::{DynamicFilter, SessionState, VisibilityPolicy};
use serde_json::Value;

struct NamedAction {
    name: String,
}

impl NamedAction {
    fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
        })
    }
}

#[async_trait]
impl CapabilityAction for NamedAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "test action"
    }

    fn definition(&self) -> ActionSpec {
        ActionSpec {
            name: self.name.clone(),
            description: "test action".to_string(),
            parameters: ActionParameterSchema::empty_object(),
        }
    }

    async fn invoke(&self, _params: Value) -> Result<ActionResult> {
        Ok(text_result("done"))
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<VisibilityEvent>>,
}

impl VisibilitySink for RecordingSink {
    fn emit(&self, event: &VisibilityEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn build_registry() -> CapabilityRegistry {
    let mut reg = CapabilityRegistry::new();
    reg.register(
        CapabilityBundle::new(CapabilityDescriptor::new("alpha", "Alpha capability"))
            .with_action(NamedAction::new("a1"))
            .with_action(NamedAction::new("a2"))
            .with_default_loader(),
    )
    .unwrap();
    reg.register(
        CapabilityBundle::new(CapabilityDescriptor::new("beta", "Beta capability"))
            .with_action(NamedAction::new("b1"))
            .with_default_loader(),
    )
    .unwrap();
    reg
}

fn visible(filter: &DynamicFilter, state: &SessionState, reg: &CapabilityRegistry) -> Vec<String> {
    filter
        .visible_actions(state, reg)
        .iter()
        .map(|a| a.name().to_string())
        .collect()
}

#[test]
fn fresh_session_sees_loader_actions_only() {
    let reg = build_registry();
    let filter = DynamicFilter::new();
    let state = SessionState::new();

    assert_eq!(visible(&filter, &state, &reg), vec!["load_alpha", "load_beta"]);
}

#[test]
fn replace_policy_swaps_the_visible_capability() {
    let reg = build_registry();
    let filter = DynamicFilter::new();
    let policy = VisibilityPolicy::Replace;
    let mut state = SessionState::new();

    state.apply(&policy, &["alpha".to_string()]);
    assert_eq!(
        visible(&filter, &state, &reg),
        vec!["load_alpha", "load_beta", "a1", "a2"]
    );

    state.apply(&policy, &["beta".to_string()]);
    assert_eq!(
        visible(&filter, &state, &reg),
        vec!["load_alpha", "load_beta", "b1"]
    );
}

#[test]
fn accumulate_policy_keeps_both_capabilities() {
    let reg = build_registry();
    let filter = DynamicFilter::new();
    let policy = VisibilityPolicy::Accumulate;
    let mut state = SessionState::new();

    state.apply(&policy, &["alpha".to_string()]);
    state.apply(&policy, &["beta".to_string()]);

    assert_eq!(
        visible(&filter, &state, &reg),
        vec!["load_alpha", "load_beta", "a1", "a2", "b1"]
    );
}

#[test]
fn bounded_fifo_evicts_the_oldest_load() {
    let reg = build_registry();
    let filter = DynamicFilter::new();
    let policy = VisibilityPolicy::BoundedFifo(1);
    let mut state = SessionState::new();

    state.apply(&policy, &["alpha".to_string()]);
    state.apply(&policy, &["beta".to_string()]);

    assert_eq!(state.loaded(), ["beta".to_string()]);
    assert_eq!(
        visible(&filter, &state, &reg),
        vec!["load_alpha", "load_beta", "b1"]
    );
}

#[test]
fn disabling_a_capability_hides_it_everywhere() {
    let mut reg = build_registry();
    let filter = DynamicFilter::new();
    let policy = VisibilityPolicy::Accumulate;
    let mut state = SessionState::new();
    state.apply(&policy, &["alpha".to_string(), "beta".to_string()]);

    assert!(reg.disable("alpha"));
    assert_eq!(visible(&filter, &state, &reg), vec!["load_beta", "b1"]);

    assert!(reg.enable("alpha"));
    assert_eq!(
        visible(&filter, &state, &reg),
        vec!["load_alpha", "load_beta", "a1", "a2", "b1"]
    );
}

#[test]
fn sink_observes_without_interfering() {
    let reg = build_registry();
    let sink = Arc::new(RecordingSink::default());
    let filter = DynamicFilter::new().with_sink(sink.clone());
    let mut state = SessionState::new();
    state.apply(&VisibilityPolicy::Replace, &["beta".to_string()]);

    let actions = filter.visible_actions(&state, &reg);
    assert_eq!(actions.len(), 3);

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].loaded_names, vec!["beta".to_string()]);
    assert_eq!(
        events[0].visible_action_names,
        vec!["load_alpha", "load_beta", "b1"]
    );
}

#[tokio::test]
async fn loader_action_returns_instructions_and_signal() {
    let reg = build_registry();
    let loader = reg
        .actions_for_loaded(&[])
        .into_iter()
        .find(|a| a.name() == "load_alpha")
        .unwrap();

    let result = loader.invoke(Value::Null).await.unwrap();
    assert!(result.content.contains("Alpha capability"));
    assert_eq!(result.details.unwrap()["capability"], "alpha");
}
