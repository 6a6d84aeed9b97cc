use crate::errors::WorkflowError;
use crate::flows::{require_f64, require_str, require_u32};
use crate::step::{overlay_defaults, FlowContext, StepForm};
use async_trait::async_trait;
use opera_domain::{tarif, Produit};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use wizard::StepResult;

pub const STEP_ID: &str = "selection";

/// Resultado del paso de sélection: el producto elegido del catálogo con
/// su precio de lista y el importe neto ya computado. El controlador y el
/// shaper tratan `total` como un número opaco; solo este paso lo calcula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionPayload {
  pub produit_id: String,
  pub libelle: String,
  pub quantite: u32,
  pub prix_unitaire: f64,
  /// Remise en porcentaje, acotada a [0, 100] por este paso.
  pub remise_pct: f64,
  /// `prix_unitaire × quantite × (1 − remise_pct/100)`, al céntimo.
  pub total: f64,
}

/// Formulario del paso de sélection. En `mount` carga el catálogo de
/// productos vendibles (solo los activos) del proveedor de referencia.
pub struct SelectionForm {
  produits: Vec<Produit>,
}

impl SelectionForm {
  pub fn new() -> Self {
    Self { produits: Vec::new() }
  }

  /// Catálogo montado, para que el anfitrión lo muestre al usuario.
  pub fn produits(&self) -> &[Produit] {
    &self.produits
  }
}

impl Default for SelectionForm {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl StepForm for SelectionForm {
  fn step_id(&self) -> &str {
    STEP_ID
  }

  async fn mount(&mut self, ctx: &FlowContext) -> Result<(), WorkflowError> {
    self.produits = ctx.list_typed::<Produit>("produits", &json!({"actif": true})).await?;
    Ok(())
  }

  fn complete(&self, input: &JsonValue, prior: Option<&JsonValue>) -> Result<StepResult, WorkflowError> {
    let input = overlay_defaults(input, prior);
    let produit_id = require_str(&input, "produit_id")?;
    let produit =
      self.produits
          .iter()
          .find(|p| p.id() == produit_id)
          .ok_or_else(|| WorkflowError::Validation(format!("producto desconocido o no vendible: '{}'", produit_id)))?;
    let quantite = require_u32(&input, "quantite")?;
    if quantite < 1 {
      return Err(WorkflowError::Validation("la cantidad debe ser al menos 1".to_string()));
    }
    let remise_pct = if input.get("remise_pct").is_some() { require_f64(&input, "remise_pct")? } else { 0.0 };
    if !(0.0..=100.0).contains(&remise_pct) {
      return Err(WorkflowError::Validation(format!("la remise debe estar entre 0 y 100: {}", remise_pct)));
    }

    let prix_unitaire = produit.prix_unitaire();
    let total = tarif::net_total(prix_unitaire, quantite, remise_pct);
    let payload = SelectionPayload { produit_id: produit.id().to_string(),
                                     libelle: produit.libelle().to_string(),
                                     quantite,
                                     prix_unitaire,
                                     remise_pct,
                                     total };
    let summary = format!("{} × {} = {:.2} €", quantite, produit.libelle(), total);
    Ok(StepResult::with_summary(serde_json::to_value(&payload)?, &summary))
  }
}

/// Validador estructural declarado en la definición. El formulario ya
/// validó campo a campo; esto solo ataja un payload mal cableado.
pub(crate) fn validate(payload: &JsonValue) -> Result<(), String> {
  let payload: SelectionPayload =
    serde_json::from_value(payload.clone()).map_err(|e| format!("payload de sélection ilegible: {}", e))?;
  if payload.produit_id.trim().is_empty() {
    return Err("sélection sin produit_id".to_string());
  }
  if payload.quantite < 1 {
    return Err("sélection con cantidad nula".to_string());
  }
  if !(0.0..=100.0).contains(&payload.remise_pct) {
    return Err(format!("remise fuera de [0, 100]: {}", payload.remise_pct));
  }
  if payload.total < 0.0 {
    return Err(format!("total negativo: {}", payload.total));
  }
  Ok(())
}
