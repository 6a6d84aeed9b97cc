use thiserror::Error;

// Errores comunes de la capa de flujos.
//
// Este enum centraliza lo que puede fallar al montar y completar los
// formularios de paso, al construir definiciones y al cablear los
// colaboradores: errores del controlador (`WizardError`), del dominio
// (`DomainError`), de la pasarela (`GatewayError`), validaciones locales
// y (de)serialización JSON.
#[derive(Error, Debug)]
pub enum WorkflowError {
  /// Errores originados por el controlador de asistentes.
  #[error("Error del asistente: {0}")]
  Wizard(#[from] wizard::WizardError),

  /// Errores originados por los tipos del dominio Opera.
  #[error("Error de dominio: {0}")]
  Domain(#[from] opera_domain::DomainError),

  /// Errores de la pasarela hacia el backend.
  #[error("Error de pasarela: {0}")]
  Gateway(#[from] opera_gateway::GatewayError),

  /// Errores de validación local de un formulario de paso.
  #[error("Error de validación: {0}")]
  Validation(String),

  /// Errores de serialización/deserialización JSON.
  #[error("Error de serialización: {0}")]
  Serialization(String),

  /// Error genérico: captura otros tipos de errores no tipados.
  #[error("Otro error: {0}")]
  Other(String),
}

impl From<serde_json::Error> for WorkflowError {
  fn from(e: serde_json::Error) -> Self {
    Self::Serialization(e.to_string())
  }
}
