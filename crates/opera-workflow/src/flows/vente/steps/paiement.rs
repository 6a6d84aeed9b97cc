use crate::errors::WorkflowError;
use crate::flows::{require_f64, require_str};
use crate::step::{overlay_defaults, FlowContext, StepForm};
use async_trait::async_trait;
use opera_domain::{ModePaiement, Rib};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use wizard::StepResult;

pub const STEP_ID: &str = "paiement";

/// Resultado del paso de paiement: el modo elegido y el importe cobrado.
/// Para un prélèvement el `rib_id` (IBAN normalizado del RIB registrado)
/// es obligatorio; para el resto de modos no viaja.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaiementPayload {
  pub mode: ModePaiement,
  pub montant: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rib_id: Option<String>,
}

/// Formulario del paso de paiement. En `mount` carga los RIBs registrados
/// del cliente del contexto, los candidatos para un mandato de prélèvement.
pub struct PaiementForm {
  ribs: Vec<Rib>,
}

impl PaiementForm {
  pub fn new() -> Self {
    Self { ribs: Vec::new() }
  }

  /// RIBs del cliente, para que el anfitrión los ofrezca al usuario.
  pub fn ribs(&self) -> &[Rib] {
    &self.ribs
  }
}

impl Default for PaiementForm {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl StepForm for PaiementForm {
  fn step_id(&self) -> &str {
    STEP_ID
  }

  async fn mount(&mut self, ctx: &FlowContext) -> Result<(), WorkflowError> {
    let client_id = ctx.context_str("client_id")?;
    self.ribs = ctx.list_typed::<Rib>("ribs", &json!({"client_id": client_id})).await?;
    Ok(())
  }

  fn complete(&self, input: &JsonValue, prior: Option<&JsonValue>) -> Result<StepResult, WorkflowError> {
    let input = overlay_defaults(input, prior);
    let mode: ModePaiement = require_str(&input, "mode")?.parse()?;
    let montant = require_f64(&input, "montant")?;
    if montant < 0.0 {
      return Err(WorkflowError::Validation(format!("el importe no puede ser negativo: {}", montant)));
    }

    // Regla cruzada del paso: un prélèvement exige un RIB ya registrado.
    let rib_id = if mode.requiere_rib() {
      let iban = require_str(&input, "rib_id")?;
      let rib = self.ribs
                    .iter()
                    .find(|r| r.iban() == iban)
                    .ok_or_else(|| {
                      WorkflowError::Validation(format!("el cliente no tiene un RIB registrado con el IBAN '{}'", iban))
                    })?;
      Some(rib.iban().to_string())
    } else {
      None
    };

    let payload = PaiementPayload { mode, montant, rib_id };
    let summary = format!("{} — {:.2} €", mode, montant);
    Ok(StepResult::with_summary(serde_json::to_value(&payload)?, &summary))
  }
}

/// Validador estructural declarado en la definición.
pub(crate) fn validate(payload: &JsonValue) -> Result<(), String> {
  let payload: PaiementPayload =
    serde_json::from_value(payload.clone()).map_err(|e| format!("payload de paiement ilegible: {}", e))?;
  if payload.montant < 0.0 {
    return Err(format!("importe negativo: {}", payload.montant));
  }
  if payload.mode.requiere_rib() && payload.rib_id.as_deref().map_or(true, |r| r.trim().is_empty()) {
    return Err("un prélèvement exige rib_id".to_string());
  }
  Ok(())
}
