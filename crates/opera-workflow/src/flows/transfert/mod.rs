// transfert/mod.rs
//
// El flujo "Transfert d'abonnement" como configuración: cible → modalités
// → confirmation.
pub mod steps;

use crate::flows::{context_key, namespace};
use crate::step::{ConfirmationForm, StepForm};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use wizard::WorkflowDefinition;

pub use steps::{CibleForm, CiblePayload, ModalitesForm, ModalitesPayload};

/// Esquema canónico de confirmación de un transfert: cliente origen (del
/// contexto), destino elegido y modalités. `motif` es el único campo
/// opcional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransfertCommit {
  pub client_id: String,
  pub cible_id: String,
  pub cible_nom: String,
  pub date_effet: NaiveDate,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub motif: Option<String>,
}

fn shape(context: &JsonValue, data: &Map<String, JsonValue>) -> wizard::Result<JsonValue> {
  let client_id = context_key(context, "client_id")?;
  let cible: CiblePayload = serde_json::from_value(namespace(data, steps::cible::STEP_ID)?.clone())?;
  let modalites: ModalitesPayload = serde_json::from_value(namespace(data, steps::modalites::STEP_ID)?.clone())?;
  let commit = TransfertCommit { client_id,
                                 cible_id: cible.cible_id,
                                 cible_nom: cible.cible_nom,
                                 date_effet: modalites.date_effet,
                                 motif: modalites.motif };
  Ok(serde_json::to_value(&commit)?)
}

/// Definición del flujo de transfert.
pub fn definition() -> wizard::Result<WorkflowDefinition> {
  WorkflowDefinition::builder("transfert").step_with(steps::cible::STEP_ID, "Cible", steps::cible::validate)
                                          .step_with(steps::modalites::STEP_ID,
                                                     "Modalités",
                                                     steps::modalites::validate)
                                          .step(ConfirmationForm::STEP_ID, "Confirmation")
                                          .shaper(shape)
                                          .build()
}

/// Juego fresco de formularios del flujo, en orden de avance.
pub fn forms() -> Vec<Box<dyn StepForm>> {
  vec![Box::new(CibleForm::new()), Box::new(ModalitesForm), Box::new(ConfirmationForm)]
}
