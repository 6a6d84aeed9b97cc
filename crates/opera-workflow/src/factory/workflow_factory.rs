use crate::errors::WorkflowError;
use crate::flows;
use crate::step::StepForm;
use crate::workflow_type::WorkflowType;
use once_cell::sync::Lazy;
use opera_gateway::HttpGateway;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use wizard::stubs::ConsoleNotifier;
use wizard::{CommitCollaborator, NotificationCollaborator, WizardController, WorkflowDefinition};

// Las definiciones se construyen una vez por proceso; el resultado de la
// construcción (incluido un eventual error del builder) queda cacheado en
// la Lazy y `definition` lo clona.
static VENTE: Lazy<wizard::Result<WorkflowDefinition>> = Lazy::new(flows::vente::definition);
static TRANSFERT: Lazy<wizard::Result<WorkflowDefinition>> = Lazy::new(flows::transfert::definition);
static RESILIATION: Lazy<wizard::Result<WorkflowDefinition>> = Lazy::new(flows::resiliation::definition);
static RIB: Lazy<wizard::Result<WorkflowDefinition>> = Lazy::new(flows::rib::definition);

/// Fábrica de los flujos de Opera: resuelve un `WorkflowType` en su
/// definición, sus formularios de paso y un controlador ya cableado con
/// los colaboradores del despliegue.
pub struct OperaWorkflowFactory;

impl OperaWorkflowFactory {
  /// Definición del flujo indicado. `Unknown` (la variante en la que caen
  /// las cadenas no reconocidas) se rechaza aquí con un error de
  /// validación.
  pub fn definition(kind: WorkflowType) -> Result<WorkflowDefinition, WorkflowError> {
    let cached = match kind {
      WorkflowType::Vente => &VENTE,
      WorkflowType::Transfert => &TRANSFERT,
      WorkflowType::Resiliation => &RESILIATION,
      WorkflowType::Rib => &RIB,
      WorkflowType::Unknown => {
        return Err(WorkflowError::Validation("tipo de workflow desconocido".to_string()));
      }
    };
    Lazy::force(cached).clone().map_err(WorkflowError::Wizard)
  }

  /// Juego fresco de formularios del flujo, en orden de avance. Cada
  /// apertura recibe el suyo: los formularios guardan estado de `mount`.
  pub fn forms(kind: WorkflowType) -> Result<Vec<Box<dyn StepForm>>, WorkflowError> {
    match kind {
      WorkflowType::Vente => Ok(flows::vente::forms()),
      WorkflowType::Transfert => Ok(flows::transfert::forms()),
      WorkflowType::Resiliation => Ok(flows::resiliation::forms()),
      WorkflowType::Rib => Ok(flows::rib::forms()),
      WorkflowType::Unknown => Err(WorkflowError::Validation("tipo de workflow desconocido".to_string())),
    }
  }

  /// Abre un controlador del flujo indicado con los colaboradores
  /// recibidos. Sin efectos externos: solo estado local.
  pub fn open(kind: WorkflowType,
              context: JsonValue,
              commit: Arc<dyn CommitCollaborator>,
              notifier: Arc<dyn NotificationCollaborator>)
              -> Result<WizardController, WorkflowError> {
    let definition = Self::definition(kind)?;
    Ok(WizardController::start(definition, context, commit, notifier)?)
  }

  /// Abre un controlador cableado contra el backend REST del entorno
  /// (`OPERA_API_URL` y compañía). Devuelve también la pasarela para que
  /// el anfitrión la use como proveedor de referencia de los formularios.
  pub fn open_from_env(kind: WorkflowType,
                       context: JsonValue)
                       -> Result<(WizardController, Arc<HttpGateway>), WorkflowError> {
    let gateway = Arc::new(HttpGateway::from_env()?);
    let controller = Self::open(kind, context, gateway.clone(), Arc::new(ConsoleNotifier))?;
    Ok((controller, gateway))
  }
}
