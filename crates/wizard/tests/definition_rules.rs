use serde_json::{json, Map, Value};
use wizard::{WizardError, WorkflowDefinition};

#[test]
fn builder_rejects_empty_kind_and_empty_sequences() {
  let err = WorkflowDefinition::builder("  ").step("uno", "Uno").build().expect_err("debe rechazar");
  assert!(matches!(err, WizardError::Definition(_)));

  let err = WorkflowDefinition::builder("vente").build().expect_err("debe rechazar");
  assert!(matches!(err, WizardError::Definition(_)));
}

#[test]
fn builder_rejects_empty_and_duplicate_step_ids() {
  let err = WorkflowDefinition::builder("vente").step("", "Sin id").build().expect_err("debe rechazar");
  assert!(matches!(err, WizardError::Definition(_)));

  let err = WorkflowDefinition::builder("vente").step("selection", "Selection")
                                                .step("selection", "Otra vez")
                                                .build()
                                                .expect_err("debe rechazar");
  assert!(matches!(err, WizardError::Definition(_)));
}

#[test]
fn sequence_queries_follow_insertion_order() {
  let d = WorkflowDefinition::builder("vente").step("selection", "Selection")
                                              .step("paiement", "Paiement")
                                              .step("confirmation", "Confirmation")
                                              .build()
                                              .expect("definición válida");

  assert_eq!(d.kind(), "vente");
  assert_eq!(d.len(), 3);
  assert_eq!(d.initial(), Some("selection"));
  assert_eq!(d.terminal(), Some("confirmation"));
  assert!(d.is_terminal("confirmation"));
  assert!(!d.is_terminal("selection"));

  assert_eq!(d.next_after("selection"), Some("paiement"));
  assert_eq!(d.next_after("confirmation"), None);
  assert_eq!(d.next_after("inexistente"), None);
  assert_eq!(d.prev_before("paiement"), Some("selection"));
  assert_eq!(d.prev_before("selection"), None);

  assert_eq!(d.position("paiement"), Some(1));
  assert_eq!(d.step("paiement").map(|s| s.title.as_str()), Some("Paiement"));
  let ids: Vec<&str> = d.step_ids().collect();
  assert_eq!(ids, vec!["selection", "paiement", "confirmation"]);
}

#[test]
fn single_step_definition_has_initial_equal_terminal() {
  let d = WorkflowDefinition::builder("ping").step("solo", "Solo").build().expect("definición válida");
  assert_eq!(d.initial(), d.terminal());
  assert!(d.is_terminal("solo"));
  assert_eq!(d.next_after("solo"), None);
  assert_eq!(d.prev_before("solo"), None);
}

#[test]
fn custom_shaper_replaces_the_generic_shape() {
  fn flatten(context: &Value, data: &Map<String, Value>) -> wizard::Result<Value> {
    let total = data.get("datos")
                    .and_then(|d| d.get("total"))
                    .cloned()
                    .ok_or_else(|| WizardError::Commit("falta el namespace 'datos'".to_string()))?;
    Ok(json!({"client_id": context["client_id"], "total": total}))
  }

  let d = WorkflowDefinition::builder("vente").step("datos", "Datos")
                                              .step("confirmation", "Confirmation")
                                              .shaper(flatten)
                                              .build()
                                              .expect("definición válida");

  let mut data = Map::new();
  data.insert("datos".to_string(), json!({"total": 540.0}));
  let body = d.shape(&json!({"client_id": "X"}), &data).expect("esquema propio");
  assert_eq!(body, json!({"client_id": "X", "total": 540.0}));

  // el shaper decide qué falta: acumulado vacío → error de confirmación
  let err = d.shape(&json!({"client_id": "X"}), &Map::new()).expect_err("debe rechazar");
  assert!(matches!(err, WizardError::Commit(_)));
}
