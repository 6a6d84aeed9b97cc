use crate::errors::WorkflowError;
use crate::flows::require_str;
use crate::step::{overlay_defaults, FlowContext, StepForm};
use async_trait::async_trait;
use opera_domain::Rib;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use wizard::StepResult;

pub const STEP_ID: &str = "saisie";

/// Resultado del paso de saisie: las coordenadas bancarias ya normalizadas
/// y validadas por el dominio (tabla de longitudes IBAN, checksum mod 97,
/// estructura del BIC). Lo que sale de este paso es utilizable tal cual en
/// un mandato.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaisiePayload {
  pub titulaire: String,
  pub banque: String,
  pub iban: String,
  pub bic: String,
}

/// Formulario del paso de saisie. En `mount` memoriza el cliente del
/// contexto; la validación de campos la delega en `opera_domain::Rib`.
pub struct SaisieForm {
  client_id: String,
}

impl SaisieForm {
  pub fn new() -> Self {
    Self { client_id: String::new() }
  }
}

impl Default for SaisieForm {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl StepForm for SaisieForm {
  fn step_id(&self) -> &str {
    STEP_ID
  }

  async fn mount(&mut self, ctx: &FlowContext) -> Result<(), WorkflowError> {
    self.client_id = ctx.context_str("client_id")?;
    Ok(())
  }

  fn complete(&self, input: &JsonValue, prior: Option<&JsonValue>) -> Result<StepResult, WorkflowError> {
    let input = overlay_defaults(input, prior);
    let titulaire = require_str(&input, "titulaire")?;
    let banque = require_str(&input, "banque")?;
    let iban = require_str(&input, "iban")?;
    let bic = require_str(&input, "bic")?;

    // el constructor del dominio normaliza y valida; sus mensajes son los
    // que se muestran en línea
    let rib = Rib::new(&self.client_id, &titulaire, &banque, &iban, &bic)?;
    let payload = SaisiePayload { titulaire: rib.titulaire().to_string(),
                                  banque: rib.banque().to_string(),
                                  iban: rib.iban().to_string(),
                                  bic: rib.bic().to_string() };
    let summary = format!("{} — {}", rib.banque(), rib.iban_masque());
    Ok(StepResult::with_summary(serde_json::to_value(&payload)?, &summary))
  }
}

/// Validador estructural declarado en la definición.
pub(crate) fn validate(payload: &JsonValue) -> Result<(), String> {
  let payload: SaisiePayload =
    serde_json::from_value(payload.clone()).map_err(|e| format!("payload de saisie ilegible: {}", e))?;
  if payload.iban.trim().is_empty() || payload.bic.trim().is_empty() {
    return Err("saisie sin IBAN o BIC".to_string());
  }
  Ok(())
}
