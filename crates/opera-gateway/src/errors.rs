// errors.rs
use thiserror::Error;

/// Errores de la pasarela hacia el backend REST.
///
/// Sólo la construcción y las llamadas internas exponen estos errores
/// tipados; hacia el controlador de asistentes todo fallo de confirmación
/// se normaliza en un `CommitAck` con `success == false`.
#[derive(Debug, Error)]
pub enum GatewayError {
  /// Configuración ausente o mal formada (variables de entorno, URL base).
  #[error("Error de configuración: {0}")]
  Config(String),
  /// Fallo de transporte: sin respuesta del backend.
  #[error("Error de transporte: {0}")]
  Transport(String),
  /// El backend respondió con un estado de error.
  #[error("Error del API ({status}): {message}")]
  Api { status: u16, message: String },
  /// Cuerpo de respuesta ilegible.
  #[error("Error de serialización: {0}")]
  Serialization(String),
}

impl From<serde_json::Error> for GatewayError {
  fn from(e: serde_json::Error) -> Self {
    Self::Serialization(e.to_string())
  }
}

impl From<reqwest::Error> for GatewayError {
  fn from(e: reqwest::Error) -> Self {
    Self::Transport(e.to_string())
  }
}
