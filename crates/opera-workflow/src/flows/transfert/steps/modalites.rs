use crate::errors::WorkflowError;
use crate::flows::{opt_str, require_date};
use crate::step::{overlay_defaults, StepForm};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use wizard::StepResult;

pub const STEP_ID: &str = "modalites";

/// Resultado del paso de modalités: cuándo surte efecto el transfert y,
/// opcionalmente, por qué se hace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalitesPayload {
  pub date_effet: NaiveDate,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub motif: Option<String>,
}

/// Formulario del paso de modalités. Sin datos de referencia: no monta
/// nada.
pub struct ModalitesForm;

#[async_trait]
impl StepForm for ModalitesForm {
  fn step_id(&self) -> &str {
    STEP_ID
  }

  fn complete(&self, input: &JsonValue, prior: Option<&JsonValue>) -> Result<StepResult, WorkflowError> {
    let input = overlay_defaults(input, prior);
    let date_effet = require_date(&input, "date_effet")?;
    let motif = opt_str(&input, "motif");

    let payload = ModalitesPayload { date_effet, motif };
    let summary = format!("effet au {}", date_effet);
    Ok(StepResult::with_summary(serde_json::to_value(&payload)?, &summary))
  }
}

/// Validador estructural declarado en la definición.
pub(crate) fn validate(payload: &JsonValue) -> Result<(), String> {
  serde_json::from_value::<ModalitesPayload>(payload.clone()).map_err(|e| format!("payload de modalités ilegible: {}", e))?;
  Ok(())
}
