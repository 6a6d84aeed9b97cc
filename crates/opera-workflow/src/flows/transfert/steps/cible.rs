use crate::errors::WorkflowError;
use crate::flows::require_str;
use crate::step::{overlay_defaults, FlowContext, StepForm};
use async_trait::async_trait;
use opera_domain::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use wizard::StepResult;

pub const STEP_ID: &str = "cible";

/// Resultado del paso de cible: el cliente que recibirá el abono. El
/// nombre viaja junto al id para que el resumen y el backend no tengan que
/// volver a resolverlo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiblePayload {
  pub cible_id: String,
  pub cible_nom: String,
}

/// Formulario del paso de cible. En `mount` carga los clientes candidatos
/// y memoriza el cliente origen del contexto para vetar el auto-transfert.
pub struct CibleForm {
  source_id: String,
  clients: Vec<Client>,
}

impl CibleForm {
  pub fn new() -> Self {
    Self { source_id: String::new(),
           clients: Vec::new() }
  }

  /// Candidatos montados, para que el anfitrión los ofrezca al usuario.
  pub fn clients(&self) -> &[Client] {
    &self.clients
  }
}

impl Default for CibleForm {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl StepForm for CibleForm {
  fn step_id(&self) -> &str {
    STEP_ID
  }

  async fn mount(&mut self, ctx: &FlowContext) -> Result<(), WorkflowError> {
    self.source_id = ctx.context_str("client_id")?;
    self.clients = ctx.list_typed::<Client>("clients", &json!({})).await?;
    Ok(())
  }

  fn complete(&self, input: &JsonValue, prior: Option<&JsonValue>) -> Result<StepResult, WorkflowError> {
    let input = overlay_defaults(input, prior);
    let cible_id = require_str(&input, "cible_id")?;
    if cible_id == self.source_id {
      return Err(WorkflowError::Validation("el destino del transfert debe ser otro cliente".to_string()));
    }
    let cible = self.clients
                    .iter()
                    .find(|c| c.id() == cible_id)
                    .ok_or_else(|| WorkflowError::Validation(format!("cliente destino desconocido: '{}'", cible_id)))?;

    let payload = CiblePayload { cible_id: cible.id().to_string(),
                                 cible_nom: cible.nom_complet() };
    let summary = format!("vers {}", cible.nom_complet());
    Ok(StepResult::with_summary(serde_json::to_value(&payload)?, &summary))
  }
}

/// Validador estructural declarado en la definición.
pub(crate) fn validate(payload: &JsonValue) -> Result<(), String> {
  let payload: CiblePayload =
    serde_json::from_value(payload.clone()).map_err(|e| format!("payload de cible ilegible: {}", e))?;
  if payload.cible_id.trim().is_empty() {
    return Err("cible sin cible_id".to_string());
  }
  Ok(())
}
