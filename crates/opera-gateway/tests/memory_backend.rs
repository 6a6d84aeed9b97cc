use opera_gateway::InMemoryBackend;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;
use wizard::{CommitCollaborator, CommitRequest, DataProvider, WizardError};

fn request(workflow: &str, body: JsonValue) -> CommitRequest {
  CommitRequest::new(workflow, Uuid::new_v4(), body).expect("solicitud válida")
}

#[tokio::test]
async fn seeded_backend_serves_domain_samples() {
  let backend = InMemoryBackend::seeded();
  let clients = backend.list("clients", &json!({})).await.expect("lista");
  assert!(clients.iter().any(|c| c["id"] == json!("C1")));

  // el filtro es igualdad campo a campo
  let actifs = backend.list("produits", &json!({"actif": true})).await.expect("lista");
  assert!(!actifs.is_empty());
  assert!(actifs.iter().all(|p| p["actif"] == json!(true)));
  let todos = backend.list("produits", &JsonValue::Null).await.expect("lista");
  assert!(todos.len() > actifs.len());

  let ribs_c1 = backend.list("ribs", &json!({"client_id": "C1"})).await.expect("lista");
  assert_eq!(ribs_c1.len(), 1);
}

#[tokio::test]
async fn unknown_resource_lists_empty() {
  let backend = InMemoryBackend::new();
  let items = backend.list("abonnements", &json!({})).await.expect("lista");
  assert!(items.is_empty());
}

#[tokio::test]
async fn commits_are_recorded_per_resource() {
  let backend = InMemoryBackend::new();
  let ack = backend.commit(&request("vente", json!({"total": 540.0}))).await;
  assert!(ack.success);
  let echo = ack.data.expect("eco del backend");
  assert_eq!(echo["id"], json!("ventes-1"));

  backend.commit(&request("rib", json!({"iban": "FR14..."}))).await;

  assert_eq!(backend.commits_for("ventes").len(), 1);
  assert_eq!(backend.commits_for("ribs").len(), 1);
  assert!(backend.commits_for("transferts").is_empty());
  assert_eq!(backend.commits().len(), 2);
  assert_eq!(backend.commit_calls(), 2);
}

#[tokio::test]
async fn fail_next_commit_rejects_once_without_recording() {
  let backend = InMemoryBackend::new();
  backend.fail_next_commit();

  let ack = backend.commit(&request("vente", json!({"total": 1.0}))).await;
  assert!(!ack.success);
  assert!(ack.message.is_some());
  assert!(backend.commits_for("ventes").is_empty());

  // el fallo se consume: el segundo intento pasa
  let ack = backend.commit(&request("vente", json!({"total": 1.0}))).await;
  assert!(ack.success);
  assert_eq!(backend.commits_for("ventes").len(), 1);
  assert_eq!(backend.commit_calls(), 2);
}

#[tokio::test]
async fn fail_next_list_fails_once_then_recovers() {
  let backend = InMemoryBackend::seeded();
  backend.fail_next_list();

  let err = backend.list("produits", &json!({})).await.expect_err("debe fallar");
  assert!(matches!(err, WizardError::Provider(_)));

  let produits = backend.list("produits", &json!({})).await.expect("reintento servido");
  assert!(!produits.is_empty());
  assert_eq!(backend.list_calls(), 2);
}
