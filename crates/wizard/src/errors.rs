// Archivo: errors.rs
// Propósito: definir los errores del controlador de asistentes y el alias
// Result<T> usado por las APIs del crate. Los comentarios y variantes están
// en español.
use thiserror::Error;

/// Errores comunes del controlador de asistentes.
///
/// - `InvalidTransition`: la operación no corresponde al paso/estado actual.
/// - `Definition`: la definición del workflow es inconsistente.
/// - `Validation`: el resultado de un paso no cumple sus reglas declaradas.
/// - `Provider`: fallo al consultar datos de referencia.
/// - `Commit`: no se pudo construir la solicitud de confirmación.
/// - `Serialization`: error al (de)serializar JSON.
#[derive(Error, Debug, Clone)]
pub enum WizardError {
    /// La operación pedida no es válida desde el paso/estado actual.
    #[error("Transición inválida: {0}")]
    InvalidTransition(String),
    /// Definición mal formada (sin pasos, ids duplicados o vacíos).
    #[error("Definición inválida: {0}")]
    Definition(String),
    /// El payload de un paso no cumple las reglas declaradas para ese paso.
    #[error("Error de validación: {0}")]
    Validation(String),
    /// El proveedor de datos de referencia falló; se reintenta a nivel de paso.
    #[error("Error del proveedor de datos: {0}")]
    Provider(String),
    /// No se pudo construir la solicitud de confirmación (clave ausente, etc.).
    #[error("Error al preparar la confirmación: {0}")]
    Commit(String),
    /// Error de serialización JSON. Se guarda el mensaje para que el enum
    /// siga siendo clonable.
    #[error("Error de serialización: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for WizardError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, WizardError>;
