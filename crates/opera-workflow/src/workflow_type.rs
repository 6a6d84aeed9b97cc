use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enum para identificar los tipos de workflow que soporta el crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
  Vente,
  Transfert,
  Resiliation,
  Rib,
  Unknown,
}

impl WorkflowType {
  /// Los cuatro flujos de negocio, en el orden del menú.
  pub fn all() -> [WorkflowType; 4] {
    [WorkflowType::Vente, WorkflowType::Transfert, WorkflowType::Resiliation, WorkflowType::Rib]
  }
}

impl fmt::Display for WorkflowType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      WorkflowType::Vente => "vente",
      WorkflowType::Transfert => "transfert",
      WorkflowType::Resiliation => "resiliation",
      WorkflowType::Rib => "rib",
      WorkflowType::Unknown => "unknown",
    };
    write!(f, "{}", s)
  }
}

impl FromStr for WorkflowType {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "vente" => Ok(WorkflowType::Vente),
      "transfert" => Ok(WorkflowType::Transfert),
      "resiliation" | "résiliation" => Ok(WorkflowType::Resiliation),
      "rib" => Ok(WorkflowType::Rib),
      _ => Ok(WorkflowType::Unknown),
    }
  }
}

impl Default for WorkflowType {
  fn default() -> Self {
    WorkflowType::Unknown
  }
}
