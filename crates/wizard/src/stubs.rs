// Archivo: stubs.rs
// Propósito: implementaciones en memoria de los colaboradores para pruebas
// y wiring rápido.
//
// Incluye un colaborador de commit guionable (`StubCommit`), un notificador
// que graba lo recibido (`RecordingNotifier`), uno de consola para demos
// (`ConsoleNotifier`) y un proveedor de datos estático (`StaticProvider`).
// Ninguno es durable: sirven para demos y pruebas locales.
use crate::collaborators::{CommitCollaborator, DataProvider, NotificationCollaborator, NoticeKind};
use crate::errors::{Result, WizardError};
use crate::instance::{CommitAck, CommitRequest};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Colaborador de commit guionable para pruebas.
///
/// Los acuses se encolan con `succeed_with`/`fail_with` y se consumen en
/// orden; cuando el guion se agota responde éxito sin eco. Registra cada
/// solicitud recibida y cuenta las llamadas, lo que permite verificar el
/// contrato de "exactamente una llamada por commit".
pub struct StubCommit {
    script: Mutex<VecDeque<CommitAck>>,
    seen: Mutex<Vec<CommitRequest>>,
    calls: AtomicUsize,
}

impl StubCommit {
    /// Crea un stub sin guion: siempre responde éxito.
    pub fn new() -> Self {
        Self { script: Mutex::new(VecDeque::new()),
               seen: Mutex::new(Vec::new()),
               calls: AtomicUsize::new(0) }
    }

    /// Encola un acuse de éxito con el eco indicado.
    pub fn succeed_with(&self, data: JsonValue) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(CommitAck::ok(Some(data)));
    }

    /// Encola un acuse de rechazo con el mensaje indicado.
    pub fn fail_with(&self, message: &str) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(CommitAck::failure(message));
    }

    /// Cantidad de llamadas recibidas hasta ahora.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copia de las solicitudes recibidas, en orden.
    pub fn requests(&self) -> Vec<CommitRequest> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for StubCommit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommitCollaborator for StubCommit {
    async fn commit(&self, request: &CommitRequest) -> CommitAck {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).push(request.clone());
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| CommitAck::ok(None))
    }
}

/// Notificador que graba cada aviso recibido. Para aserciones en pruebas.
pub struct RecordingNotifier {
    events: Mutex<Vec<(NoticeKind, String)>>,
}

impl RecordingNotifier {
    /// Crea un notificador vacío.
    pub fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }

    /// Copia de los avisos recibidos, en orden.
    pub fn events(&self) -> Vec<(NoticeKind, String)> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCollaborator for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((kind, message.to_string()));
    }
}

/// Notificador de consola para demos interactivas.
pub struct ConsoleNotifier;

impl NotificationCollaborator for ConsoleNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success => println!("✅ {}", message),
            NoticeKind::Error => println!("❌ {}", message),
        }
    }
}

/// Proveedor de datos estático: los recursos se siembran por nombre y las
/// consultas filtran por igualdad de campos. `fail_once` fuerza el fallo de
/// la siguiente consulta para probar el reintento a nivel de paso.
pub struct StaticProvider {
    data: Mutex<HashMap<String, Vec<JsonValue>>>,
    fail_next: AtomicBool,
}

impl StaticProvider {
    /// Crea un proveedor sin recursos.
    pub fn new() -> Self {
        Self { data: Mutex::new(HashMap::new()),
               fail_next: AtomicBool::new(false) }
    }

    /// Siembra (o reemplaza) los elementos de un recurso.
    pub fn seed(&self, resource: &str, items: Vec<JsonValue>) {
        self.data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(resource.to_string(), items);
    }

    /// La próxima consulta fallará con `WizardError::Provider`.
    pub fn fail_once(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl Default for StaticProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Indica si `item` satisface todos los pares clave/valor de `filter`.
fn matches_filter(item: &JsonValue, filter: &JsonValue) -> bool {
    match filter {
        JsonValue::Null => true,
        JsonValue::Object(pairs) => pairs.iter().all(|(k, v)| item.get(k) == Some(v)),
        _ => false,
    }
}

#[async_trait]
impl DataProvider for StaticProvider {
    async fn list(&self, resource: &str, filter: &JsonValue) -> Result<Vec<JsonValue>> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(WizardError::Provider(format!("fallo simulado consultando '{}'", resource)));
        }
        let data = self.data.lock().unwrap_or_else(|e| e.into_inner());
        Ok(data.get(resource)
               .cloned()
               .unwrap_or_default()
               .into_iter()
               .filter(|item| matches_filter(item, filter))
               .collect())
    }
}
