// resiliation/mod.rs
//
// El flujo "Résiliation" como configuración: motif → confirmation. El
// flujo más corto del repertorio, dos pasos en total.
pub mod steps;

use crate::flows::{context_key, namespace};
use crate::step::{ConfirmationForm, StepForm};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use wizard::WorkflowDefinition;

pub use steps::{MotifForm, MotifPayload};

/// Esquema canónico de confirmación de una résiliation. `abonnement_id`
/// viaja si el anfitrión lo puso en el contexto (résiliation de un abono
/// concreto); sin él, el backend rescinde el abono vigente del cliente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResiliationCommit {
  pub client_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub abonnement_id: Option<String>,
  pub motif: String,
  pub date_effet: NaiveDate,
  pub frais: f64,
}

fn shape(context: &JsonValue, data: &Map<String, JsonValue>) -> wizard::Result<JsonValue> {
  let client_id = context_key(context, "client_id")?;
  let abonnement_id = context.get("abonnement_id").and_then(|v| v.as_str()).map(str::to_string);
  let motif: MotifPayload = serde_json::from_value(namespace(data, steps::motif::STEP_ID)?.clone())?;
  let commit = ResiliationCommit { client_id,
                                   abonnement_id,
                                   motif: motif.motif,
                                   date_effet: motif.date_effet,
                                   frais: motif.frais };
  Ok(serde_json::to_value(&commit)?)
}

/// Definición del flujo de résiliation.
pub fn definition() -> wizard::Result<WorkflowDefinition> {
  WorkflowDefinition::builder("resiliation").step_with(steps::motif::STEP_ID, "Motif", steps::motif::validate)
                                            .step(ConfirmationForm::STEP_ID, "Confirmation")
                                            .shaper(shape)
                                            .build()
}

/// Juego fresco de formularios del flujo, en orden de avance.
pub fn forms() -> Vec<Box<dyn StepForm>> {
  vec![Box::new(MotifForm), Box::new(ConfirmationForm)]
}
