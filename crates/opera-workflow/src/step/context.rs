use crate::errors::WorkflowError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use wizard::DataProvider;

/// Contexto pasado a los formularios de paso para facilitar el acceso
/// tipado al contexto de solo lectura del workflow y al proveedor de datos
/// de referencia.
///
/// Este helper no acopla los formularios al controlador: un paso que
/// necesita referencias (productos vendibles, clientes destino, RIBs del
/// cliente) las consulta por aquí en `mount`, fuera de la vista del
/// controlador.
pub struct FlowContext {
  context: JsonValue,
  provider: Arc<dyn DataProvider>,
}

impl FlowContext {
  /// Crea un contexto de flujo a partir del contexto de solo lectura del
  /// anfitrión y el proveedor de referencia del despliegue.
  pub fn new(context: JsonValue, provider: Arc<dyn DataProvider>) -> Self {
    Self { context, provider }
  }

  /// Contexto de solo lectura completo.
  pub fn context(&self) -> &JsonValue {
    &self.context
  }

  /// Valor de texto obligatorio del contexto. Un contexto sin la clave es
  /// un error de cableado del anfitrión, no del usuario.
  pub fn context_str(&self, key: &str) -> Result<String, WorkflowError> {
    self.context
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| WorkflowError::Validation(format!("el contexto no trae '{}'", key)))
  }

  /// Valor de texto opcional del contexto.
  pub fn context_opt(&self, key: &str) -> Option<String> {
    self.context.get(key).and_then(|v| v.as_str()).map(str::to_string)
  }

  /// Consulta cruda de un recurso de referencia.
  pub async fn list(&self, resource: &str, filter: &JsonValue) -> Result<Vec<JsonValue>, WorkflowError> {
    Ok(self.provider.list(resource, filter).await?)
  }

  /// Consulta un recurso y deserializa cada elemento en `T`. Los elementos
  /// que no encajan en `T` se descartan: el backend puede servir campos de
  /// más, nunca bloquear el paso por ello.
  pub async fn list_typed<T: DeserializeOwned>(&self,
                                               resource: &str,
                                               filter: &JsonValue)
                                               -> Result<Vec<T>, WorkflowError> {
    let items = self.provider.list(resource, filter).await?;
    Ok(items.into_iter().filter_map(|item| serde_json::from_value(item).ok()).collect())
  }
}

/// Combina la entrada del usuario con el namespace previo del paso: los
/// campos presentes en `input` mandan y los ausentes caen al valor previo.
///
/// Es el único lugar donde se resuelve el pre-relleno tras un `go_back`:
/// un formulario re-visitado puede reenviar solo lo que cambió y conservar
/// el resto de lo que ya había contestado.
pub fn overlay_defaults(input: &JsonValue, prior: Option<&JsonValue>) -> JsonValue {
  let mut merged: Map<String, JsonValue> = match prior.and_then(|p| p.as_object()) {
    Some(previous) => previous.clone(),
    None => Map::new(),
  };
  if let Some(pairs) = input.as_object() {
    for (key, value) in pairs {
      if value.is_null() {
        continue;
      }
      merged.insert(key.clone(), value.clone());
    }
  }
  JsonValue::Object(merged)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn overlay_prefers_input_and_falls_back_to_prior() {
    let prior = json!({"quantite": 2, "remise_pct": 10.0});
    let merged = overlay_defaults(&json!({"quantite": 3}), Some(&prior));
    assert_eq!(merged, json!({"quantite": 3, "remise_pct": 10.0}));
  }

  #[test]
  fn overlay_ignores_explicit_nulls() {
    let prior = json!({"motif": "déménagement"});
    let merged = overlay_defaults(&json!({"motif": null, "frais": 0.0}), Some(&prior));
    assert_eq!(merged, json!({"motif": "déménagement", "frais": 0.0}));
  }

  #[test]
  fn overlay_without_prior_is_the_input() {
    assert_eq!(overlay_defaults(&json!({"a": 1}), None), json!({"a": 1}));
  }
}
