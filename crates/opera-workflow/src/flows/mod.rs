//! Los cuatro flujos de negocio de Opera, expresados como configuración:
//! cada flujo aporta su `WorkflowDefinition` (pasos + validadores +
//! esquema de confirmación), sus payloads tipados y sus formularios de
//! paso. Toda la lógica de secuenciación vive en el controlador genérico.
pub mod resiliation;
pub mod rib;
pub mod transfert;
pub mod vente;

use crate::errors::WorkflowError;
use chrono::NaiveDate;
use serde_json::{Map, Value as JsonValue};
use wizard::WizardError;

/// Namespace obligatorio del acumulado, para los shapers. Una confirmación
/// jamás se construye desde un acumulado parcial: si falta el namespace la
/// solicitud no sale.
pub(crate) fn namespace<'a>(data: &'a Map<String, JsonValue>, step: &str) -> wizard::Result<&'a JsonValue> {
  data.get(step).ok_or_else(|| WizardError::Commit(format!("falta el namespace del paso '{}'", step)))
}

/// Clave de texto obligatoria del contexto de solo lectura, para los
/// shapers (típicamente `client_id`).
pub(crate) fn context_key(context: &JsonValue, key: &str) -> wizard::Result<String> {
  context.get(key)
         .and_then(|v| v.as_str())
         .map(str::to_string)
         .ok_or_else(|| WizardError::Commit(format!("el contexto no trae '{}'", key)))
}

// Lectura de campos de formulario sobre la entrada ya combinada con el
// namespace previo. Las pantallas mandan los números como texto, así que
// los lectores numéricos aceptan ambas formas.

pub(crate) fn require_str(input: &JsonValue, key: &str) -> Result<String, WorkflowError> {
  match input.get(key).and_then(|v| v.as_str()).map(str::trim) {
    Some(s) if !s.is_empty() => Ok(s.to_string()),
    _ => Err(WorkflowError::Validation(format!("falta el campo obligatorio '{}'", key))),
  }
}

pub(crate) fn opt_str(input: &JsonValue, key: &str) -> Option<String> {
  input.get(key).and_then(|v| v.as_str()).map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

pub(crate) fn require_f64(input: &JsonValue, key: &str) -> Result<f64, WorkflowError> {
  let value = match input.get(key) {
    Some(JsonValue::Number(n)) => n.as_f64(),
    Some(JsonValue::String(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
    _ => None,
  };
  match value {
    Some(v) if v.is_finite() => Ok(v),
    _ => Err(WorkflowError::Validation(format!("el campo '{}' debe ser un número", key))),
  }
}

pub(crate) fn require_u32(input: &JsonValue, key: &str) -> Result<u32, WorkflowError> {
  let value = match input.get(key) {
    Some(JsonValue::Number(n)) => n.as_u64(),
    Some(JsonValue::String(s)) => s.trim().parse::<u64>().ok(),
    _ => None,
  };
  value.and_then(|v| u32::try_from(v).ok())
       .ok_or_else(|| WorkflowError::Validation(format!("el campo '{}' debe ser un entero positivo", key)))
}

pub(crate) fn require_bool(input: &JsonValue, key: &str) -> Result<bool, WorkflowError> {
  match input.get(key) {
    Some(JsonValue::Bool(b)) => Ok(*b),
    Some(JsonValue::String(s)) => match s.trim().to_lowercase().as_str() {
      "true" | "oui" | "si" | "sí" => Ok(true),
      "false" | "non" | "no" => Ok(false),
      _ => Err(WorkflowError::Validation(format!("el campo '{}' debe ser sí/no", key))),
    },
    _ => Err(WorkflowError::Validation(format!("falta el campo obligatorio '{}'", key))),
  }
}

/// Fecha en formato ISO `AAAA-MM-JJ`, el único que viaja hacia el backend.
pub(crate) fn require_date(input: &JsonValue, key: &str) -> Result<NaiveDate, WorkflowError> {
  let raw = require_str(input, key)?;
  NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
    .map_err(|_| WorkflowError::Validation(format!("el campo '{}' debe ser una fecha AAAA-MM-JJ: '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn numeric_fields_accept_screen_strings() {
    let input = json!({"montant": "59,90", "quantite": "2"});
    assert_eq!(require_f64(&input, "montant").unwrap(), 59.9);
    assert_eq!(require_u32(&input, "quantite").unwrap(), 2);
    assert!(require_f64(&input, "absent").is_err());
    assert!(require_u32(&json!({"quantite": -1}), "quantite").is_err());
  }

  #[test]
  fn dates_must_be_iso() {
    assert!(require_date(&json!({"date_effet": "2026-09-01"}), "date_effet").is_ok());
    assert!(require_date(&json!({"date_effet": "01/09/2026"}), "date_effet").is_err());
  }

  #[test]
  fn empty_strings_do_not_satisfy_required_fields() {
    assert!(require_str(&json!({"motif": "   "}), "motif").is_err());
    assert_eq!(opt_str(&json!({"motif": "  "}), "motif"), None);
    assert_eq!(opt_str(&json!({"motif": " x "}), "motif").as_deref(), Some("x"));
  }
}
