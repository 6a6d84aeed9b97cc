use crate::errors::WorkflowError;
use crate::flows::{require_date, require_f64, require_str};
use crate::step::{overlay_defaults, StepForm};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use wizard::StepResult;

pub const STEP_ID: &str = "motif";

/// Resultado del único paso de datos de una résiliation: por qué se
/// rescinde, desde cuándo y con qué frais de cierre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotifPayload {
  pub motif: String,
  pub date_effet: NaiveDate,
  pub frais: f64,
}

/// Formulario del paso de motif. Sin datos de referencia: no monta nada.
pub struct MotifForm;

#[async_trait]
impl StepForm for MotifForm {
  fn step_id(&self) -> &str {
    STEP_ID
  }

  fn complete(&self, input: &JsonValue, prior: Option<&JsonValue>) -> Result<StepResult, WorkflowError> {
    let input = overlay_defaults(input, prior);
    let motif = require_str(&input, "motif")?;
    let date_effet = require_date(&input, "date_effet")?;
    // frais de cierre opcionales en pantalla, 0 por defecto
    let frais = if input.get("frais").is_some() { require_f64(&input, "frais")? } else { 0.0 };
    if frais < 0.0 {
      return Err(WorkflowError::Validation(format!("los frais no pueden ser negativos: {}", frais)));
    }

    let payload = MotifPayload { motif: motif.clone(),
                                 date_effet,
                                 frais };
    let summary = format!("{} — effet au {}", motif, date_effet);
    Ok(StepResult::with_summary(serde_json::to_value(&payload)?, &summary))
  }
}

/// Validador estructural declarado en la definición.
pub(crate) fn validate(payload: &JsonValue) -> Result<(), String> {
  let payload: MotifPayload =
    serde_json::from_value(payload.clone()).map_err(|e| format!("payload de motif ilegible: {}", e))?;
  if payload.motif.trim().is_empty() {
    return Err("résiliation sin motif".to_string());
  }
  if payload.frais < 0.0 {
    return Err(format!("frais negativos: {}", payload.frais));
  }
  Ok(())
}
