// vente/mod.rs
//
// El flujo "Nouvelle vente" como configuración: sélection → paiement →
// confirmation, con su esquema canónico de confirmación. La secuenciación
// la interpreta el controlador genérico.
pub mod steps;

use crate::flows::{context_key, namespace};
use crate::step::{ConfirmationForm, StepForm};
use opera_domain::ModePaiement;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use wizard::WorkflowDefinition;

pub use steps::{PaiementForm, PaiementPayload, SelectionForm, SelectionPayload};

/// Esquema canónico de confirmación de una venta. Un solo esquema para
/// todas las pantallas: `client_id` sale del contexto de solo lectura y el
/// resto de los namespaces de sélection y paiement, sin recomputar nada.
///
/// Campos obligatorios salvo `rib_id`, que solo viaja con un prélèvement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenteCommit {
  pub client_id: String,
  pub produit_id: String,
  pub libelle: String,
  pub quantite: u32,
  pub prix_unitaire: f64,
  pub remise_pct: f64,
  pub total: f64,
  pub mode_paiement: ModePaiement,
  pub montant: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rib_id: Option<String>,
}

/// Shaper del flujo: determinista y solo desde un acumulado terminal; un
/// namespace ausente corta la confirmación antes de salir hacia la red.
fn shape(context: &JsonValue, data: &Map<String, JsonValue>) -> wizard::Result<JsonValue> {
  let client_id = context_key(context, "client_id")?;
  let selection: SelectionPayload = serde_json::from_value(namespace(data, steps::selection::STEP_ID)?.clone())?;
  let paiement: PaiementPayload = serde_json::from_value(namespace(data, steps::paiement::STEP_ID)?.clone())?;
  let commit = VenteCommit { client_id,
                             produit_id: selection.produit_id,
                             libelle: selection.libelle,
                             quantite: selection.quantite,
                             prix_unitaire: selection.prix_unitaire,
                             remise_pct: selection.remise_pct,
                             // el total viaja tal cual lo computó el paso
                             total: selection.total,
                             mode_paiement: paiement.mode,
                             montant: paiement.montant,
                             rib_id: paiement.rib_id };
  Ok(serde_json::to_value(&commit)?)
}

/// Definición del flujo de venta.
pub fn definition() -> wizard::Result<WorkflowDefinition> {
  WorkflowDefinition::builder("vente").step_with(steps::selection::STEP_ID, "Sélection", steps::selection::validate)
                                      .step_with(steps::paiement::STEP_ID, "Paiement", steps::paiement::validate)
                                      .step(ConfirmationForm::STEP_ID, "Confirmation")
                                      .shaper(shape)
                                      .build()
}

/// Juego fresco de formularios del flujo, en orden de avance.
pub fn forms() -> Vec<Box<dyn StepForm>> {
  vec![Box::new(SelectionForm::new()), Box::new(PaiementForm::new()), Box::new(ConfirmationForm)]
}
