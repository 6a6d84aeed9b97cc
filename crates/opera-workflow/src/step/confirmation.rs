use crate::errors::WorkflowError;
use crate::step::StepForm;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use wizard::{StepResult, WorkflowDefinition};

/// Paso terminal compartido por los cuatro flujos: el resumen de lo
/// acumulado antes de confirmar. No produce datos; la acción de continuar
/// en este paso es `commit()` del controlador, así que `complete` siempre
/// rechaza.
pub struct ConfirmationForm;

impl ConfirmationForm {
  pub const STEP_ID: &'static str = "confirmation";

  /// Líneas del resumen: un renglón por paso completado, con el título de
  /// la definición y el payload compacto, en orden de avance.
  pub fn recap(definition: &WorkflowDefinition, data: &serde_json::Map<String, JsonValue>) -> Vec<String> {
    definition.step_ids()
              .filter_map(|id| {
                let payload = data.get(id)?;
                let title = definition.step(id).map(|s| s.title.as_str()).unwrap_or(id);
                Some(format!("{}: {}", title, payload))
              })
              .collect()
  }
}

#[async_trait]
impl StepForm for ConfirmationForm {
  fn step_id(&self) -> &str {
    Self::STEP_ID
  }

  fn complete(&self, _input: &JsonValue, _prior: Option<&JsonValue>) -> Result<StepResult, WorkflowError> {
    Err(WorkflowError::Validation("el paso de confirmación no produce datos; continuar aquí es commit()".to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn recap_lists_completed_steps_in_order() {
    let definition = WorkflowDefinition::builder("vente").step("selection", "Sélection")
                                                         .step("paiement", "Paiement")
                                                         .step("confirmation", "Confirmation")
                                                         .build()
                                                         .unwrap();
    let mut data = serde_json::Map::new();
    data.insert("paiement".to_string(), json!({"mode": "especes"}));
    data.insert("selection".to_string(), json!({"produit_id": "P1"}));

    let lines = ConfirmationForm::recap(&definition, &data);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Sélection:"));
    assert!(lines[1].starts_with("Paiement:"));
  }

  #[test]
  fn completing_the_terminal_step_is_rejected() {
    assert!(ConfirmationForm.complete(&json!({}), None).is_err());
  }
}
