// http.rs
use crate::config::GatewayConfig;
use crate::errors::GatewayError;
use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value as JsonValue;
use wizard::{CommitAck, CommitCollaborator, CommitRequest, DataProvider, WizardError};

/// Recurso REST que persiste cada tipo de workflow. Los tipos no
/// contemplados siguen la convención de pluralizar el nombre.
pub fn resource_for_workflow(workflow: &str) -> String {
  match workflow {
    "vente" => "ventes".to_string(),
    "transfert" => "transferts".to_string(),
    "resiliation" => "resiliations".to_string(),
    "rib" => "ribs".to_string(),
    other => format!("{}s", other),
  }
}

/// Pasarela REST/JSON hacia el backend de Opera. Implementa los dos
/// colaboradores del controlador: confirma workflows (`POST`) y sirve
/// datos de referencia (`GET`). Nunca reintenta por su cuenta; un segundo
/// intento de confirmación siempre lo dispara el usuario.
pub struct HttpGateway {
  config: GatewayConfig,
  client: reqwest::Client,
}

impl HttpGateway {
  pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
    let client = reqwest::Client::builder().timeout(config.timeout).build()?;
    debug!("pasarela HTTP hacia {} (timeout {:?})", config.base_url, config.timeout);
    Ok(Self { config, client })
  }

  pub fn from_env() -> Result<Self, GatewayError> {
    Self::new(GatewayConfig::from_env()?)
  }

  pub fn config(&self) -> &GatewayConfig {
    &self.config
  }

  fn url_for(&self, resource: &str) -> String {
    format!("{}/{}", self.config.base_url, resource)
  }

  fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.config.token {
      Some(token) => builder.bearer_auth(token),
      None => builder,
    }
  }

  /// Una única petición `POST` por solicitud de confirmación. La huella de
  /// la solicitud viaja como clave de idempotencia para que un reintento
  /// del usuario no duplique la operación en el backend.
  async fn post_commit(&self, request: &CommitRequest) -> Result<Option<JsonValue>, GatewayError> {
    let url = self.url_for(&resource_for_workflow(&request.workflow));
    debug!("POST {} (instancia {}, huella {})", url, request.instance_id, request.fingerprint);
    let response = self.authorized(self.client.post(&url))
                       .header("X-Idempotency-Key", &request.fingerprint)
                       .json(&request.body)
                       .send()
                       .await?;
    let status = response.status();
    if status.is_success() {
      // El eco del backend es opcional; un cuerpo vacío o no-JSON no es un
      // fallo de la confirmación ya aceptada.
      let data = response.json::<JsonValue>().await.ok();
      info!("confirmación '{}' aceptada ({})", request.workflow, status);
      return Ok(data);
    }
    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body).unwrap_or_else(|| format!("el backend respondió {}", status));
    warn!("confirmación '{}' rechazada ({}): {}", request.workflow, status, message);
    Err(GatewayError::Api { status: status.as_u16(), message })
  }

  async fn get_list(&self, resource: &str, filter: &JsonValue) -> Result<Vec<JsonValue>, GatewayError> {
    let url = self.url_for(resource);
    let mut builder = self.authorized(self.client.get(&url));
    if let Some(pairs) = filter.as_object() {
      let query: Vec<(String, String)> = pairs.iter()
                                              .filter_map(|(k, v)| scalar_text(v).map(|s| (k.clone(), s)))
                                              .collect();
      builder = builder.query(&query);
    }
    debug!("GET {}", url);
    let response = builder.send().await?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      let message = extract_message(&body).unwrap_or_else(|| format!("el backend respondió {}", status));
      return Err(GatewayError::Api { status: status.as_u16(), message });
    }
    let body: JsonValue = response.json()
                                  .await
                                  .map_err(|e| GatewayError::Serialization(format!("GET {}: {}", url, e)))?;
    match body {
      JsonValue::Array(items) => Ok(items),
      // Algunos recursos envuelven la lista en { "data": [...] }.
      JsonValue::Object(mut map) => match map.remove("data") {
        Some(JsonValue::Array(items)) => Ok(items),
        _ => Err(GatewayError::Serialization(format!("GET {}: se esperaba una lista", url))),
      },
      _ => Err(GatewayError::Serialization(format!("GET {}: se esperaba una lista", url))),
    }
  }
}

#[async_trait]
impl CommitCollaborator for HttpGateway {
  async fn commit(&self, request: &CommitRequest) -> CommitAck {
    // Normalización del contrato: transporte caído y rechazo del
    // backend llegan igual al controlador, como acuse con mensaje.
    match self.post_commit(request).await {
      Ok(data) => CommitAck::ok(data),
      Err(e) => CommitAck::failure(&e.to_string()),
    }
  }
}

#[async_trait]
impl DataProvider for HttpGateway {
  async fn list(&self, resource: &str, filter: &JsonValue) -> wizard::Result<Vec<JsonValue>> {
    self.get_list(resource, filter)
        .await
        .map_err(|e| WizardError::Provider(e.to_string()))
  }
}

/// Extrae el detalle legible de un cuerpo de error: el campo `message` (o
/// `error`) si el cuerpo es JSON, o el texto plano no vacío.
fn extract_message(body: &str) -> Option<String> {
  if let Ok(value) = serde_json::from_str::<JsonValue>(body) {
    for key in ["message", "error"] {
      if let Some(m) = value.get(key).and_then(|m| m.as_str()) {
        return Some(m.to_string());
      }
    }
  }
  let trimmed = body.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}

/// Representación de un valor escalar como parámetro de query. Objetos y
/// listas no viajan en la query string.
fn scalar_text(value: &JsonValue) -> Option<String> {
  match value {
    JsonValue::String(s) => Some(s.clone()),
    JsonValue::Number(n) => Some(n.to_string()),
    JsonValue::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}
