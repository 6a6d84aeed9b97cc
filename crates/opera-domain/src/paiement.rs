// paiement.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Modos de pago aceptados por la caja. La forma serializada es siempre la
/// variante en minúsculas y sin acentos ("prelevement"), aunque `FromStr`
/// también acepta la grafía francesa acentuada que llega de las pantallas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModePaiement {
  Especes,
  Cheque,
  Carte,
  Prelevement,
}

impl ModePaiement {
  /// Los modos en el orden en que se ofrecen en pantalla.
  pub fn all() -> [ModePaiement; 4] {
    [ModePaiement::Especes, ModePaiement::Cheque, ModePaiement::Carte, ModePaiement::Prelevement]
  }

  /// Indica si el modo exige un RIB registrado (mandato de prélèvement).
  pub fn requiere_rib(&self) -> bool {
    matches!(self, ModePaiement::Prelevement)
  }
}

impl fmt::Display for ModePaiement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      ModePaiement::Especes => "especes",
      ModePaiement::Cheque => "cheque",
      ModePaiement::Carte => "carte",
      ModePaiement::Prelevement => "prelevement",
    };
    write!(f, "{}", s)
  }
}

impl FromStr for ModePaiement {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "especes" | "espèces" => Ok(ModePaiement::Especes),
      "cheque" | "chèque" => Ok(ModePaiement::Cheque),
      "carte" => Ok(ModePaiement::Carte),
      "prelevement" | "prélèvement" => Ok(ModePaiement::Prelevement),
      other => Err(DomainError::Validation(format!("modo de pago desconocido: '{}'", other))),
    }
  }
}
