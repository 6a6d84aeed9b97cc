use crate::errors::WorkflowError;
use crate::flows::{require_bool, require_date};
use crate::step::{overlay_defaults, StepForm};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use wizard::StepResult;

pub const STEP_ID: &str = "mandat";

/// Resultado del paso de mandat: la firma del mandato SEPA asociado al
/// RIB y si autoriza cobros recurrentes o uno puntual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MandatPayload {
  pub date_signature: NaiveDate,
  pub recurrent: bool,
}

/// Formulario del paso de mandat. Sin datos de referencia: no monta nada.
pub struct MandatForm;

#[async_trait]
impl StepForm for MandatForm {
  fn step_id(&self) -> &str {
    STEP_ID
  }

  fn complete(&self, input: &JsonValue, prior: Option<&JsonValue>) -> Result<StepResult, WorkflowError> {
    let input = overlay_defaults(input, prior);
    let date_signature = require_date(&input, "date_signature")?;
    let recurrent = require_bool(&input, "recurrent")?;

    let payload = MandatPayload { date_signature, recurrent };
    let summary = format!("mandat {} signé le {}",
                          if recurrent { "récurrent" } else { "ponctuel" },
                          date_signature);
    Ok(StepResult::with_summary(serde_json::to_value(&payload)?, &summary))
  }
}

/// Validador estructural declarado en la definición.
pub(crate) fn validate(payload: &JsonValue) -> Result<(), String> {
  serde_json::from_value::<MandatPayload>(payload.clone()).map_err(|e| format!("payload de mandat ilegible: {}", e))?;
  Ok(())
}
