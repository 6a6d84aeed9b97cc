use crate::errors::WorkflowError;
use crate::step::FlowContext;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use wizard::StepResult;

/// Contrato de un formulario de paso: la vista de un paso traducida fuera
/// de cualquier framework de UI.
///
/// Ciclo de vida:
/// - `mount` se llama al entrar al paso y es donde el formulario consulta
///   sus datos de referencia. Un fallo aquí bloquea el paso y el anfitrión
///   ofrece reintentar `mount`; la instancia no se entera.
/// - `complete` se llama una vez por acción de "continuar" del usuario.
///   Hace las comprobaciones de presencia y formato de sus campos y emite
///   el `StepResult` inmutable que el anfitrión pasa a `advance`. Tras un
///   `go_back`, el namespace previo llega en `prior` y el reenvío lo
///   reemplaza por completo (semántica del controlador).
///
/// Los errores de `complete` son locales: el anfitrión los muestra en
/// línea y vuelve a pedir los campos, sin tocar al controlador.
#[async_trait]
pub trait StepForm: Send + Sync {
  /// Id del paso que renderiza este formulario (clave del namespace).
  fn step_id(&self) -> &str;

  /// Carga los datos de referencia del paso. Por defecto no hay ninguno.
  async fn mount(&mut self, _ctx: &FlowContext) -> Result<(), WorkflowError> {
    Ok(())
  }

  /// Valida la entrada del usuario y emite el resultado del paso.
  fn complete(&self, input: &JsonValue, prior: Option<&JsonValue>) -> Result<StepResult, WorkflowError>;
}
