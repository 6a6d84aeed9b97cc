// memory.rs
use crate::http::resource_for_workflow;
use async_trait::async_trait;
use dashmap::DashMap;
use opera_domain::Samples;
use serde_json::{json, Value as JsonValue};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use wizard::{CommitAck, CommitCollaborator, CommitRequest, DataProvider, WizardError};

/// Backend completo en memoria: datos de referencia sembrables y libro de
/// confirmaciones aceptadas, indexados por recurso. Implementa los dos
/// colaboradores del controlador, así que una demo o una prueba de
/// integración puede recorrer un workflow entero sin red.
///
/// Los fallos se guionan con `fail_next_commit`/`fail_next_list`: el
/// siguiente commit llega rechazado (y no se anota en el libro) y la
/// siguiente consulta falla con `WizardError::Provider`, lo que permite
/// ejercitar el reintento del usuario y el reintento a nivel de paso.
pub struct InMemoryBackend {
  data: DashMap<String, Vec<JsonValue>>,
  ledger: DashMap<String, Vec<CommitRequest>>,
  fail_commit: AtomicBool,
  fail_list: AtomicBool,
  commit_calls: AtomicUsize,
  list_calls: AtomicUsize,
}

impl InMemoryBackend {
  /// Crea un backend vacío, sin recursos ni confirmaciones.
  pub fn new() -> Self {
    Self { data: DashMap::new(),
           ledger: DashMap::new(),
           fail_commit: AtomicBool::new(false),
           fail_list: AtomicBool::new(false),
           commit_calls: AtomicUsize::new(0),
           list_calls: AtomicUsize::new(0) }
  }

  /// Crea un backend sembrado con los juegos de datos del dominio
  /// (clientes, productos y RIBs de muestra).
  pub fn seeded() -> Self {
    let backend = Self::new();
    backend.seed("clients",
                 Samples::clients().iter().filter_map(|c| serde_json::to_value(c).ok()).collect());
    backend.seed("produits",
                 Samples::produits().iter().filter_map(|p| serde_json::to_value(p).ok()).collect());
    backend.seed("ribs", Samples::ribs().iter().filter_map(|r| serde_json::to_value(r).ok()).collect());
    backend
  }

  /// Siembra (o reemplaza) los elementos de un recurso.
  pub fn seed(&self, resource: &str, items: Vec<JsonValue>) {
    self.data.insert(resource.to_string(), items);
  }

  /// El siguiente commit llegará rechazado y no se anotará en el libro.
  pub fn fail_next_commit(&self) {
    self.fail_commit.store(true, Ordering::SeqCst);
  }

  /// La siguiente consulta de referencia fallará con `Provider`.
  pub fn fail_next_list(&self) {
    self.fail_list.store(true, Ordering::SeqCst);
  }

  /// Confirmaciones aceptadas para un recurso, en orden de llegada.
  pub fn commits_for(&self, resource: &str) -> Vec<CommitRequest> {
    self.ledger.get(resource).map(|e| e.value().clone()).unwrap_or_default()
  }

  /// Todas las confirmaciones aceptadas, con su recurso.
  pub fn commits(&self) -> Vec<(String, CommitRequest)> {
    let mut out: Vec<(String, CommitRequest)> = Vec::new();
    for entry in self.ledger.iter() {
      for request in entry.value() {
        out.push((entry.key().clone(), request.clone()));
      }
    }
    out
  }

  /// Llamadas de confirmación recibidas (aceptadas y rechazadas).
  pub fn commit_calls(&self) -> usize {
    self.commit_calls.load(Ordering::SeqCst)
  }

  /// Consultas de referencia recibidas (servidas y falladas).
  pub fn list_calls(&self) -> usize {
    self.list_calls.load(Ordering::SeqCst)
  }
}

impl Default for InMemoryBackend {
  fn default() -> Self {
    Self::new()
  }
}

/// Igualdad campo a campo contra los pares del filtro; `null` (o un objeto
/// vacío) lista todo. Misma semántica que el `StaticProvider` de `wizard`.
fn matches_filter(item: &JsonValue, filter: &JsonValue) -> bool {
  match filter {
    JsonValue::Null => true,
    JsonValue::Object(pairs) => pairs.iter().all(|(k, v)| item.get(k) == Some(v)),
    _ => false,
  }
}

#[async_trait]
impl CommitCollaborator for InMemoryBackend {
  async fn commit(&self, request: &CommitRequest) -> CommitAck {
    self.commit_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_commit.swap(false, Ordering::SeqCst) {
      return CommitAck::failure("fallo simulado del backend");
    }
    let resource = resource_for_workflow(&request.workflow);
    let mut entry = self.ledger.entry(resource.clone()).or_default();
    entry.push(request.clone());
    let echo = json!({
      "id": format!("{}-{}", resource, entry.len()),
      "fingerprint": request.fingerprint,
    });
    CommitAck::ok(Some(echo))
  }
}

#[async_trait]
impl DataProvider for InMemoryBackend {
  async fn list(&self, resource: &str, filter: &JsonValue) -> wizard::Result<Vec<JsonValue>> {
    self.list_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_list.swap(false, Ordering::SeqCst) {
      return Err(WizardError::Provider(format!("fallo simulado consultando '{}'", resource)));
    }
    Ok(self.data
           .get(resource)
           .map(|e| e.value().clone())
           .unwrap_or_default()
           .into_iter()
           .filter(|item| matches_filter(item, filter))
           .collect())
  }
}
