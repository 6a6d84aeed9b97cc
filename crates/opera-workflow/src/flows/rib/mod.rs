// rib/mod.rs
//
// El flujo "Ajouter un RIB" como configuración: saisie → mandat →
// confirmation. La validación bancaria (IBAN, BIC) vive en el dominio; el
// paso de saisie solo la invoca.
pub mod steps;

use crate::flows::{context_key, namespace};
use crate::step::{ConfirmationForm, StepForm};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use wizard::WorkflowDefinition;

pub use steps::{MandatForm, MandatPayload, SaisieForm, SaisiePayload};

/// Esquema canónico de confirmación de un alta de RIB: coordenadas
/// normalizadas más el mandato firmado. Todos los campos obligatorios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RibCommit {
  pub client_id: String,
  pub titulaire: String,
  pub banque: String,
  pub iban: String,
  pub bic: String,
  pub date_signature: NaiveDate,
  pub recurrent: bool,
}

fn shape(context: &JsonValue, data: &Map<String, JsonValue>) -> wizard::Result<JsonValue> {
  let client_id = context_key(context, "client_id")?;
  let saisie: SaisiePayload = serde_json::from_value(namespace(data, steps::saisie::STEP_ID)?.clone())?;
  let mandat: MandatPayload = serde_json::from_value(namespace(data, steps::mandat::STEP_ID)?.clone())?;
  let commit = RibCommit { client_id,
                           titulaire: saisie.titulaire,
                           banque: saisie.banque,
                           iban: saisie.iban,
                           bic: saisie.bic,
                           date_signature: mandat.date_signature,
                           recurrent: mandat.recurrent };
  Ok(serde_json::to_value(&commit)?)
}

/// Definición del flujo de alta de RIB.
pub fn definition() -> wizard::Result<WorkflowDefinition> {
  WorkflowDefinition::builder("rib").step_with(steps::saisie::STEP_ID, "Saisie", steps::saisie::validate)
                                    .step_with(steps::mandat::STEP_ID, "Mandat", steps::mandat::validate)
                                    .step(ConfirmationForm::STEP_ID, "Confirmation")
                                    .shaper(shape)
                                    .build()
}

/// Juego fresco de formularios del flujo, en orden de avance.
pub fn forms() -> Vec<Box<dyn StepForm>> {
  vec![Box::new(SaisieForm::new()), Box::new(MandatForm), Box::new(ConfirmationForm)]
}
