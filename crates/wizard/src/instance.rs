// Archivo: instance.rs
// Propósito: estado en memoria de un workflow en curso (instancia, datos
// acumulados por namespace, bitácora de transiciones) y los tipos que
// viajan hacia los colaboradores (solicitud de confirmación y su acuse).
use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use uuid::Uuid;

/// Estado del ciclo de vida de una instancia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// El usuario sigue completando pasos.
    InProgress,
    /// Hay una confirmación en vuelo hacia el backend.
    Committing,
    /// El backend aceptó la confirmación; la instancia queda cerrada.
    Committed,
    /// El backend rechazó la confirmación (estado transitorio: se vuelve a
    /// `InProgress` en el paso terminal para permitir el reintento).
    Failed,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkflowStatus::InProgress => "in_progress",
            WorkflowStatus::Committing => "committing",
            WorkflowStatus::Committed => "committed",
            WorkflowStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Resultado inmutable de completar un paso. Una vez construido no se puede
/// modificar; volver a visitar el paso produce un `StepResult` nuevo que
/// reemplaza el namespace completo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    payload: JsonValue,
    summary: Option<String>,
}

impl StepResult {
    /// Crea el resultado de un paso a partir de su payload.
    pub fn new(payload: JsonValue) -> Self {
        Self { payload, summary: None }
    }

    /// Variante con resumen legible (se muestra en el paso de confirmación).
    pub fn with_summary(payload: JsonValue, summary: &str) -> Self {
        Self { payload,
               summary: Some(summary.to_string()) }
    }

    /// Payload del paso.
    pub fn payload(&self) -> &JsonValue {
        &self.payload
    }

    /// Resumen legible, si el paso lo declaró.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub(crate) fn into_payload(self) -> JsonValue {
        self.payload
    }
}

/// Evento registrado en la bitácora de la instancia. La bitácora es solo
/// de crecimiento: permite inspeccionar la secuencia vivida (incluido el
/// paso por `Failed`) aun cuando el estado final sea otro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Transition {
    Started { step: String },
    Advanced { from: String, to: String },
    WentBack { from: String, to: String },
    CommitAttempted { fingerprint: String },
    CommitRejected { message: String },
    Committed,
}

/// Instancia en curso de un workflow: puntero al paso actual, datos
/// acumulados por namespace y estado del ciclo de vida. Solo el controlador
/// muta este estado; el resto del mundo lo observa por los accesores.
#[derive(Debug, Clone)]
pub struct WorkflowInstance {
    id: Uuid,
    kind: String,
    context: JsonValue,
    current: String,
    data: Map<String, JsonValue>,
    status: WorkflowStatus,
    last_error: Option<String>,
    journal: Vec<Transition>,
    created_at: DateTime<Utc>,
}

impl WorkflowInstance {
    pub(crate) fn new(kind: &str, initial_step: &str, context: JsonValue) -> Self {
        Self { id: Uuid::new_v4(),
               kind: kind.to_string(),
               context,
               current: initial_step.to_string(),
               data: Map::new(),
               status: WorkflowStatus::InProgress,
               last_error: None,
               journal: vec![Transition::Started { step: initial_step.to_string() }],
               created_at: Utc::now() }
    }

    /// Identificador único de la instancia.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Tipo de workflow al que pertenece.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Contexto inicial de solo lectura (quién/qué abrió el workflow).
    pub fn context(&self) -> &JsonValue {
        &self.context
    }

    /// Id del paso actual.
    pub fn current_step(&self) -> &str {
        &self.current
    }

    /// Estado del ciclo de vida.
    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    /// Datos acumulados: un namespace por paso completado.
    pub fn data(&self) -> &Map<String, JsonValue> {
        &self.data
    }

    /// Payload guardado para un paso, si ese paso ya fue completado. Tras
    /// un `go_back` el namespace se conserva y sirve para pre-rellenar.
    pub fn namespace(&self, step_id: &str) -> Option<&JsonValue> {
        self.data.get(step_id)
    }

    /// Último mensaje de rechazo del backend, si hubo alguno.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Bitácora de transiciones, en orden.
    pub fn journal(&self) -> &[Transition] {
        &self.journal
    }

    /// Momento de apertura de la instancia.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn record_step(&mut self, step_id: &str, payload: JsonValue) {
        // Reemplazo completo del namespace: nunca se mezclan payloads de
        // visitas distintas al mismo paso.
        self.data.insert(step_id.to_string(), payload);
    }

    pub(crate) fn set_current(&mut self, step_id: &str) {
        self.current = step_id.to_string();
    }

    pub(crate) fn set_status(&mut self, status: WorkflowStatus) {
        self.status = status;
    }

    pub(crate) fn set_error(&mut self, message: &str) {
        self.last_error = Some(message.to_string());
    }

    pub(crate) fn push(&mut self, transition: Transition) {
        self.journal.push(transition);
    }
}

/// Solicitud de confirmación enviada al colaborador de commit. Se deriva
/// únicamente de los datos acumulados en el paso terminal: reconstruirla
/// para la misma instancia produce el mismo cuerpo y la misma huella.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRequest {
    /// Tipo de workflow que confirma.
    pub workflow: String,
    /// Instancia que origina la solicitud.
    pub instance_id: Uuid,
    /// Cuerpo con el esquema explícito del flujo.
    pub body: JsonValue,
    /// Huella blake3 del cuerpo canónico; estable entre reintentos de la
    /// misma instancia y distinta entre instancias. Sirve como clave de
    /// idempotencia hacia el backend.
    pub fingerprint: String,
}

impl CommitRequest {
    /// Construye la solicitud calculando la huella sobre la serialización
    /// canónica del cuerpo (claves de objeto ordenadas por `serde_json`).
    pub fn new(workflow: &str, instance_id: Uuid, body: JsonValue) -> Result<Self> {
        let canonical = serde_json::to_string(&body)?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(workflow.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(instance_id.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(canonical.as_bytes());
        let fingerprint = hasher.finalize().to_hex().to_string();
        Ok(Self { workflow: workflow.to_string(),
                  instance_id,
                  body,
                  fingerprint })
    }
}

/// Acuse normalizado del colaborador de commit: tanto los fallos de
/// transporte como los rechazos de negocio llegan como `success == false`
/// con un mensaje, nunca como panics ni como errores tipados distintos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAck {
    pub success: bool,
    /// Eco opcional del backend (por ejemplo el registro creado).
    pub data: Option<JsonValue>,
    /// Detalle legible del rechazo cuando `success == false`.
    pub message: Option<String>,
}

impl CommitAck {
    /// Acuse de éxito con eco opcional del backend.
    pub fn ok(data: Option<JsonValue>) -> Self {
        Self { success: true,
               data,
               message: None }
    }

    /// Acuse de rechazo con el detalle normalizado.
    pub fn failure(message: &str) -> Self {
        Self { success: false,
               data: None,
               message: Some(message.to_string()) }
    }
}

/// Desenlace de `commit()` hacia el anfitrión del asistente.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// El backend aceptó: la UI anfitriona debe cerrar el asistente.
    Committed { receipt: Option<JsonValue> },
    /// El backend rechazó: la instancia sigue abierta en el paso terminal
    /// con los datos intactos para reintentar o volver atrás.
    Rejected { message: String },
}

impl CommitOutcome {
    /// Señal de cierre para la UI anfitriona.
    pub fn should_close(&self) -> bool {
        matches!(self, CommitOutcome::Committed { .. })
    }
}
