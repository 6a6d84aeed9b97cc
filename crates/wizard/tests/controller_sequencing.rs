use serde_json::json;
use std::sync::Arc;
use wizard::stubs::{RecordingNotifier, StubCommit};
use wizard::{StepResult, WizardController, WizardError, WorkflowDefinition, WorkflowStatus};

fn demo_definition() -> WorkflowDefinition {
  WorkflowDefinition::builder("demo").step("uno", "Uno")
                                     .step("dos", "Dos")
                                     .step("confirmation", "Confirmation")
                                     .build()
                                     .expect("definición válida")
}

fn open(definition: WorkflowDefinition) -> WizardController {
  WizardController::start(definition,
                          json!({"client_id": "X"}),
                          Arc::new(StubCommit::new()),
                          Arc::new(RecordingNotifier::new())).expect("start")
}

#[test]
fn starts_at_initial_step_without_data() {
  let ctl = open(demo_definition());
  assert_eq!(ctl.current_step(), "uno");
  assert_eq!(ctl.status(), WorkflowStatus::InProgress);
  assert!(ctl.instance().data().is_empty());
  assert_eq!(ctl.progress(), (1, 3));
}

#[test]
fn advance_from_wrong_step_fails_and_leaves_data_unchanged() {
  let mut ctl = open(demo_definition());
  // "dos" is not the current step yet
  let err = ctl.advance("dos", StepResult::new(json!({"b": 2}))).expect_err("debe rechazar");
  assert!(matches!(err, WizardError::InvalidTransition(_)));
  assert!(ctl.instance().data().is_empty());
  assert_eq!(ctl.current_step(), "uno");

  ctl.advance("uno", StepResult::new(json!({"a": 1}))).expect("avanza a dos");
  // repeating the already-left step must fail too, without touching data
  let err = ctl.advance("uno", StepResult::new(json!({"a": 99}))).expect_err("debe rechazar");
  assert!(matches!(err, WizardError::InvalidTransition(_)));
  assert_eq!(ctl.prior("uno"), Some(&json!({"a": 1})));
  assert_eq!(ctl.instance().data().len(), 1);
}

#[test]
fn namespaces_match_visited_steps_exactly() {
  let mut ctl = open(demo_definition());
  ctl.advance("uno", StepResult::new(json!({"a": 1}))).expect("avanza");
  ctl.advance("dos", StepResult::new(json!({"b": 2}))).expect("avanza");

  let keys: Vec<&str> = ctl.instance().data().keys().map(String::as_str).collect();
  assert_eq!(keys, vec!["dos", "uno"]);
  assert_eq!(ctl.prior("uno"), Some(&json!({"a": 1})));
  assert_eq!(ctl.prior("dos"), Some(&json!({"b": 2})));
  assert_eq!(ctl.prior("confirmation"), None);
  assert_eq!(ctl.current_step(), "confirmation");
}

#[test]
fn go_back_keeps_namespace_and_readvance_replaces_it() {
  let mut ctl = open(demo_definition());
  ctl.advance("uno", StepResult::new(json!({"a": 1}))).expect("avanza");
  ctl.advance("dos", StepResult::new(json!({"b": 2}))).expect("avanza");

  let back = ctl.go_back().expect("retrocede");
  assert_eq!(back, "dos");
  // prefill: the abandoned namespace is still readable
  assert_eq!(ctl.prior("dos"), Some(&json!({"b": 2})));

  ctl.advance("dos", StepResult::new(json!({"b": 20, "extra": true}))).expect("re-avanza");
  assert_eq!(ctl.prior("dos"), Some(&json!({"b": 20, "extra": true})));
  assert_eq!(ctl.instance().data().len(), 2);
  assert_eq!(ctl.current_step(), "confirmation");
}

#[test]
fn go_back_at_initial_step_is_rejected() {
  let mut ctl = open(demo_definition());
  let err = ctl.go_back().expect_err("debe rechazar");
  assert!(matches!(err, WizardError::InvalidTransition(_)));
}

#[test]
fn advance_at_terminal_step_is_rejected() {
  let mut ctl = open(demo_definition());
  ctl.advance("uno", StepResult::new(json!({"a": 1}))).expect("avanza");
  ctl.advance("dos", StepResult::new(json!({"b": 2}))).expect("avanza");
  let err = ctl.advance("confirmation", StepResult::new(json!({}))).expect_err("debe rechazar");
  assert!(matches!(err, WizardError::InvalidTransition(_)));
  assert_eq!(ctl.instance().data().len(), 2);
}

#[test]
fn step_validator_rejects_without_recording() {
  fn positive(payload: &serde_json::Value) -> Result<(), String> {
    if payload.get("n").and_then(|v| v.as_i64()).unwrap_or(-1) >= 0 {
      Ok(())
    } else {
      Err("n debe ser >= 0".to_string())
    }
  }
  let definition = WorkflowDefinition::builder("demo").step_with("datos", "Datos", positive)
                                                      .step("confirmation", "Confirmation")
                                                      .build()
                                                      .expect("definición válida");
  let mut ctl = open(definition);
  let err = ctl.advance("datos", StepResult::new(json!({"n": -5}))).expect_err("debe rechazar");
  assert!(matches!(err, WizardError::Validation(_)));
  assert!(ctl.instance().data().is_empty());
  assert_eq!(ctl.current_step(), "datos");

  ctl.advance("datos", StepResult::new(json!({"n": 5}))).expect("payload válido avanza");
  assert_eq!(ctl.current_step(), "confirmation");
}

#[test]
fn progress_follows_navigation() {
  let mut ctl = open(demo_definition());
  ctl.advance("uno", StepResult::new(json!({}))).expect("avanza");
  assert_eq!(ctl.progress(), (2, 3));
  ctl.go_back().expect("retrocede");
  assert_eq!(ctl.progress(), (1, 3));
}
