// Archivo: collaborators.rs
// Propósito: contratos hacia el exterior del controlador. El controlador
// nunca habla HTTP ni toca una UI: confirma a través de `CommitCollaborator`,
// avisa por `NotificationCollaborator` y los pasos leen datos de referencia
// por `DataProvider`. Las implementaciones reales viven en otros crates;
// `stubs.rs` trae dobles en memoria para pruebas.
use crate::errors::Result;
use crate::instance::{CommitAck, CommitRequest};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Severidad de una notificación al usuario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Colaborador que materializa la confirmación final contra el backend.
///
/// Contrato:
/// - el controlador lo invoca exactamente una vez por `commit()`;
/// - nunca reintenta por su cuenta: un segundo intento siempre lo dispara
///   el usuario;
/// - normaliza cualquier fallo (transporte o negocio) en un `CommitAck`
///   con `success == false`, jamás en un panic.
#[async_trait]
pub trait CommitCollaborator: Send + Sync {
    async fn commit(&self, request: &CommitRequest) -> CommitAck;
}

/// Colaborador de notificaciones efímeras (toast). Disparar y olvidar: el
/// controlador no espera confirmación ni lee respuesta.
pub trait NotificationCollaborator: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Proveedor de datos de referencia para los pasos (productos, clientes,
/// RIBs...). Un fallo aquí no es fatal para la instancia: el paso que
/// consulta ofrece reintentar sin perder lo acumulado.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Lista los elementos de `resource` que satisfacen `filter`. El filtro
    /// es un objeto JSON cuyos pares clave/valor deben coincidir con los
    /// del elemento; un objeto vacío (o `null`) lista todo.
    async fn list(&self, resource: &str, filter: &JsonValue) -> Result<Vec<JsonValue>>;
}
