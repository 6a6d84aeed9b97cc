// Archivo: controller.rs
// Propósito: implementar el controlador genérico de asistentes multi-paso.
//
// Nota: El controlador es el único dueño de la instancia y de sus
// transiciones. Los flujos concretos (venta, transferencia, ...) no heredan
// ni duplican esta lógica: se describen como `WorkflowDefinition` y el
// controlador los interpreta.
use crate::collaborators::{CommitCollaborator, NotificationCollaborator, NoticeKind};
use crate::definition::WorkflowDefinition;
use crate::errors::{Result, WizardError};
use crate::instance::{CommitOutcome, CommitRequest, StepResult, Transition, WorkflowInstance, WorkflowStatus};
use std::sync::Arc;

/// Controlador de un asistente multi-paso.
///
/// Responsabilidades principales:
/// - Mantener la instancia (paso actual, datos por namespace, estado)
/// - Hacer cumplir el orden total de pasos de la definición
/// - Construir la solicitud de confirmación y delegarla al colaborador
/// - Avisar el desenlace por el colaborador de notificaciones
///
/// Nota sobre concurrencia y doble envío:
/// - `commit()` toma `&mut self` y mantiene el préstamo durante toda la
///   llamada al colaborador, así que ningún otro método (ni un segundo
///   `commit`, ni `cancel`) puede intercalarse mientras hay una
///   confirmación en vuelo.
/// - `cancel()` consume el controlador: descartar es irreversible y después
///   no queda nada sobre lo que operar.
pub struct WizardController {
    definition: WorkflowDefinition,
    instance: WorkflowInstance,
    commit: Arc<dyn CommitCollaborator>,
    notifier: Arc<dyn NotificationCollaborator>,
}

impl WizardController {
    /// Abre una instancia nueva en el paso inicial de la definición, con el
    /// contexto de solo lectura recibido del anfitrión. No produce ningún
    /// efecto externo.
    pub fn start(definition: WorkflowDefinition,
                 context: serde_json::Value,
                 commit: Arc<dyn CommitCollaborator>,
                 notifier: Arc<dyn NotificationCollaborator>)
                 -> Result<Self> {
        let initial = definition.initial()
                                .ok_or_else(|| WizardError::Definition("definición sin pasos".into()))?
                                .to_string();
        let instance = WorkflowInstance::new(definition.kind(), &initial, context);
        Ok(Self { definition,
                  instance,
                  commit,
                  notifier })
    }

    /// Registra el resultado del paso actual y avanza al siguiente.
    ///
    /// Input:
    /// - `step_id`: paso que el anfitrión cree estar completando. Debe ser
    ///   el paso actual y no terminal.
    /// - `result`: resultado inmutable del paso; reemplaza por completo el
    ///   namespace de ese paso.
    ///
    /// Output:
    /// - `Ok(siguiente)` con el id del nuevo paso actual.
    /// - `Err(InvalidTransition)` si el paso no es el actual, si es el
    ///   terminal o si la instancia ya no está en curso. En ese caso los
    ///   datos acumulados quedan exactamente como estaban.
    pub fn advance(&mut self, step_id: &str, result: StepResult) -> Result<String> {
        self.ensure_in_progress("advance")?;
        let current = self.instance.current_step().to_string();
        if step_id != current {
            return Err(WizardError::InvalidTransition(format!("advance: se esperaba el paso '{}' y llegó '{}'",
                                                              current, step_id)));
        }
        // El paso terminal no produce datos: su acción de continuar es
        // `commit()`.
        let next = match self.definition.next_after(step_id) {
            Some(n) => n.to_string(),
            None => {
                return Err(WizardError::InvalidTransition(format!("advance: '{}' es el paso terminal", step_id)));
            }
        };
        if let Some(validate) = self.definition.step(step_id).and_then(|s| s.validate) {
            validate(result.payload()).map_err(WizardError::Validation)?;
        }
        self.instance.record_step(step_id, result.into_payload());
        self.instance.push(Transition::Advanced { from: current,
                                                  to: next.clone() });
        self.instance.set_current(&next);
        Ok(next)
    }

    /// Retrocede un paso. El namespace del paso abandonado se conserva para
    /// pre-rellenar el formulario al volver a visitarlo.
    pub fn go_back(&mut self) -> Result<String> {
        self.ensure_in_progress("go_back")?;
        let current = self.instance.current_step().to_string();
        let prev = match self.definition.prev_before(&current) {
            Some(p) => p.to_string(),
            None => {
                return Err(WizardError::InvalidTransition(format!("go_back: '{}' es el paso inicial", current)));
            }
        };
        self.instance.push(Transition::WentBack { from: current,
                                                  to: prev.clone() });
        self.instance.set_current(&prev);
        Ok(prev)
    }

    /// Dispara la confirmación final contra el backend.
    ///
    /// Solo es válida en el paso terminal con la instancia en curso; en
    /// cualquier otra situación (incluido un `commit` sobre una instancia
    /// ya confirmada) devuelve `InvalidTransition` sin tocar al colaborador.
    ///
    /// Secuencia:
    /// 1. estado pasa a `Committing` (el préstamo `&mut` bloquea cualquier
    ///    otro disparo mientras la llamada está en vuelo);
    /// 2. se construye la solicitud con el esquema del flujo, determinista
    ///    a partir del acumulado;
    /// 3. exactamente una llamada al colaborador, sin reintentos propios;
    /// 4. acuse de éxito: estado `Committed`, notificación de éxito y
    ///    `CommitOutcome::Committed` (señal de cierre para el anfitrión);
    /// 5. acuse de rechazo: la instancia pasa por `Failed`, se notifica el
    ///    error y vuelve a `InProgress` en el paso terminal con los datos
    ///    intactos, devolviendo `CommitOutcome::Rejected` para que el
    ///    usuario reintente o retroceda a corregir.
    pub async fn commit(&mut self) -> Result<CommitOutcome> {
        self.ensure_in_progress("commit")?;
        let current = self.instance.current_step();
        if !self.definition.is_terminal(current) {
            return Err(WizardError::InvalidTransition(format!("commit: '{}' no es el paso terminal", current)));
        }
        self.instance.set_status(WorkflowStatus::Committing);

        let request = match self.build_request() {
            Ok(r) => r,
            Err(e) => {
                // No llegó a salir nada hacia el backend: la instancia
                // vuelve a estar editable tal cual estaba.
                self.instance.set_status(WorkflowStatus::InProgress);
                return Err(e);
            }
        };
        self.instance.push(Transition::CommitAttempted { fingerprint: request.fingerprint.clone() });

        let ack = self.commit.commit(&request).await;
        if ack.success {
            self.instance.set_status(WorkflowStatus::Committed);
            self.instance.push(Transition::Committed);
            self.notifier.notify(NoticeKind::Success,
                                 &format!("'{}' confirmado correctamente", self.instance.kind()));
            Ok(CommitOutcome::Committed { receipt: ack.data })
        } else {
            let message = ack.message.unwrap_or_else(|| "rechazo sin detalle del backend".to_string());
            self.instance.set_status(WorkflowStatus::Failed);
            self.instance.push(Transition::CommitRejected { message: message.clone() });
            self.instance.set_error(&message);
            self.notifier.notify(NoticeKind::Error, &message);
            // Reintento a cargo del usuario: la instancia queda en curso en
            // el paso terminal, con el acumulado intacto.
            self.instance.set_status(WorkflowStatus::InProgress);
            Ok(CommitOutcome::Rejected { message })
        }
    }

    /// Abandona la instancia sin confirmar nada. Consume el controlador:
    /// el descarte es incondicional e irreversible y el colaborador de
    /// commit jamás se entera.
    pub fn cancel(self) -> uuid::Uuid {
        self.instance.id()
    }

    /// Construye la solicitud de confirmación para el estado actual. Es una
    /// función pura del contexto + acumulado: útil también para inspección.
    pub fn build_request(&self) -> Result<CommitRequest> {
        let body = self.definition.shape(self.instance.context(), self.instance.data())?;
        CommitRequest::new(self.instance.kind(), self.instance.id(), body)
    }

    /// Id del paso actual.
    pub fn current_step(&self) -> &str {
        self.instance.current_step()
    }

    /// Estado del ciclo de vida de la instancia.
    pub fn status(&self) -> WorkflowStatus {
        self.instance.status()
    }

    /// Posición (base 1) y total de pasos, para el indicador de progreso.
    pub fn progress(&self) -> (usize, usize) {
        let pos = self.definition.position(self.instance.current_step()).map(|i| i + 1).unwrap_or(0);
        (pos, self.definition.len())
    }

    /// Instancia completa, de solo lectura.
    pub fn instance(&self) -> &WorkflowInstance {
        &self.instance
    }

    /// Definición que interpreta este controlador.
    pub fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }

    /// Payload guardado de un paso ya visitado (pre-relleno tras `go_back`).
    pub fn prior(&self, step_id: &str) -> Option<&serde_json::Value> {
        self.instance.namespace(step_id)
    }

    /// Indica si la instancia sigue abierta para interacción.
    pub fn is_open(&self) -> bool {
        self.instance.status() != WorkflowStatus::Committed
    }

    fn ensure_in_progress(&self, op: &str) -> Result<()> {
        let status = self.instance.status();
        if status != WorkflowStatus::InProgress {
            return Err(WizardError::InvalidTransition(format!("{}: la instancia está '{}'", op, status)));
        }
        Ok(())
    }
}
