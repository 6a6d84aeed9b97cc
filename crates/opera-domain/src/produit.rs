// produit.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Producto vendible del club (abonnement, cours, artículo de boutique).
/// `prix_unitaire` es el precio de lista; la remise se aplica por venta, no
/// sobre el producto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Produit {
  id: String,
  libelle: String,
  categorie: String,
  prix_unitaire: f64,
  actif: bool,
}

impl Produit {
  pub fn new(id: &str, libelle: &str, categorie: &str, prix_unitaire: f64) -> Result<Self, DomainError> {
    if id.trim().is_empty() {
      return Err(DomainError::Validation("el id del producto no puede estar vacío".to_string()));
    }
    if libelle.trim().is_empty() {
      return Err(DomainError::Validation("el libellé del producto no puede estar vacío".to_string()));
    }
    if categorie.trim().is_empty() {
      return Err(DomainError::Validation("la categoría del producto no puede estar vacía".to_string()));
    }
    if !prix_unitaire.is_finite() || prix_unitaire < 0.0 {
      return Err(DomainError::Validation(format!("precio unitario inválido: {}", prix_unitaire)));
    }
    Ok(Self { id: id.trim().to_string(),
              libelle: libelle.trim().to_string(),
              categorie: categorie.trim().to_string(),
              prix_unitaire,
              actif: true })
  }

  /// Marca el producto como retirado del catálogo (deja de ser vendible).
  pub fn desactivado(mut self) -> Self {
    self.actif = false;
    self
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn libelle(&self) -> &str {
    &self.libelle
  }

  pub fn categorie(&self) -> &str {
    &self.categorie
  }

  pub fn prix_unitaire(&self) -> f64 {
    self.prix_unitaire
  }

  pub fn actif(&self) -> bool {
    self.actif
  }
}

impl fmt::Display for Produit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} — {} ({:.2} €)", self.id, self.libelle, self.prix_unitaire)
  }
}
