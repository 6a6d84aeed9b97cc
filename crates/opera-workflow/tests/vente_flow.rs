use opera_gateway::InMemoryBackend;
use opera_workflow::{FlowContext, OperaWorkflowFactory, StepForm, WorkflowType};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use wizard::stubs::RecordingNotifier;
use wizard::{NoticeKind, WizardController, WorkflowStatus};

fn harness() -> (Arc<InMemoryBackend>, Arc<RecordingNotifier>, WizardController, FlowContext, Vec<Box<dyn StepForm>>) {
  let backend = Arc::new(InMemoryBackend::seeded());
  let notifier = Arc::new(RecordingNotifier::new());
  let context = json!({"client_id": "C1"});
  let ctl = OperaWorkflowFactory::open(WorkflowType::Vente, context.clone(), backend.clone(), notifier.clone())
    .expect("apertura");
  let flow_ctx = FlowContext::new(context, backend.clone());
  let forms = OperaWorkflowFactory::forms(WorkflowType::Vente).expect("formularios");
  (backend, notifier, ctl, flow_ctx, forms)
}

/// Monta el formulario del paso, lo completa con `input` y avanza.
async fn fill(ctl: &mut WizardController,
              forms: &mut [Box<dyn StepForm>],
              flow_ctx: &FlowContext,
              step_id: &str,
              input: JsonValue) {
  let form = forms.iter_mut().find(|f| f.step_id() == step_id).expect("formulario del paso");
  form.mount(flow_ctx).await.expect("mount");
  let prior = ctl.prior(step_id).cloned();
  let result = form.complete(&input, prior.as_ref()).expect("complete");
  ctl.advance(step_id, result).expect("advance");
}

#[tokio::test]
async fn successful_sale_commits_notifies_and_closes() {
  let (backend, notifier, mut ctl, flow_ctx, mut forms) = harness();

  fill(&mut ctl, &mut forms, &flow_ctx, "selection", json!({"produit_id": "P1", "quantite": 1})).await;
  fill(&mut ctl, &mut forms, &flow_ctx, "paiement", json!({"mode": "especes", "montant": 500})).await;
  assert_eq!(ctl.current_step(), "confirmation");

  let outcome = ctl.commit().await.expect("commit");
  assert!(outcome.should_close());
  assert_eq!(ctl.status(), WorkflowStatus::Committed);
  assert_eq!(notifier.events()[0].0, NoticeKind::Success);

  // el libro del backend tiene la venta con el esquema canónico
  let commits = backend.commits_for("ventes");
  assert_eq!(commits.len(), 1);
  let body = &commits[0].body;
  assert_eq!(body["client_id"], json!("C1"));
  assert_eq!(body["produit_id"], json!("P1"));
  assert_eq!(body["quantite"], json!(1));
  assert_eq!(body["prix_unitaire"], json!(500.0));
  assert_eq!(body["remise_pct"], json!(0.0));
  assert_eq!(body["total"], json!(500.0));
  assert_eq!(body["mode_paiement"], json!("especes"));
  assert_eq!(body["montant"], json!(500.0));
  assert!(body.get("rib_id").is_none());
}

#[tokio::test]
async fn selection_computes_the_discounted_total() {
  let (_backend, _notifier, mut ctl, flow_ctx, mut forms) = harness();

  // P3 vale 300.00; 2 unidades con 10% de remise → 540.00
  fill(&mut ctl,
       &mut forms,
       &flow_ctx,
       "selection",
       json!({"produit_id": "P3", "quantite": "2", "remise_pct": "10"})).await;
  let selection = ctl.prior("selection").expect("namespace");
  assert_eq!(selection["total"], json!(540.0));
  assert_eq!(selection["libelle"], json!("Pack découverte 10 séances"));
}

#[tokio::test]
async fn failed_commit_keeps_data_and_allows_a_successful_retry() {
  let (backend, notifier, mut ctl, flow_ctx, mut forms) = harness();
  fill(&mut ctl, &mut forms, &flow_ctx, "selection", json!({"produit_id": "P1", "quantite": 1})).await;
  fill(&mut ctl, &mut forms, &flow_ctx, "paiement", json!({"mode": "carte", "montant": 500})).await;

  backend.fail_next_commit();
  let outcome = ctl.commit().await.expect("rechazo");
  assert!(!outcome.should_close());
  assert_eq!(ctl.status(), WorkflowStatus::InProgress);
  assert_eq!(ctl.current_step(), "confirmation");
  assert!(ctl.prior("selection").is_some());
  assert!(ctl.prior("paiement").is_some());
  assert_eq!(notifier.events()[0].0, NoticeKind::Error);
  assert!(backend.commits_for("ventes").is_empty());

  let outcome = ctl.commit().await.expect("reintento");
  assert!(outcome.should_close());
  assert_eq!(backend.commit_calls(), 2);
  assert_eq!(backend.commits_for("ventes").len(), 1);
}

#[tokio::test]
async fn cancellation_mid_flow_never_reaches_the_backend() {
  let (backend, notifier, mut ctl, flow_ctx, mut forms) = harness();
  fill(&mut ctl, &mut forms, &flow_ctx, "selection", json!({"produit_id": "P2", "quantite": 1})).await;

  ctl.cancel();
  assert_eq!(backend.commit_calls(), 0);
  assert!(notifier.events().is_empty());
}

#[tokio::test]
async fn prelevement_requires_a_registered_rib() {
  let (backend, _notifier, mut ctl, flow_ctx, mut forms) = harness();
  fill(&mut ctl, &mut forms, &flow_ctx, "selection", json!({"produit_id": "P1", "quantite": 1})).await;

  let form = forms.iter_mut().find(|f| f.step_id() == "paiement").expect("formulario");
  form.mount(&flow_ctx).await.expect("mount");

  // sin rib_id → bloqueado en el paso
  assert!(form.complete(&json!({"mode": "prelevement", "montant": 500}), None).is_err());
  // IBAN no registrado para C1 → bloqueado
  assert!(form.complete(&json!({"mode": "prelevement", "montant": 500, "rib_id": "DE89370400440532013000"}), None)
              .is_err());

  // el RIB de C1 sí pasa y viaja en la confirmación
  let result = form.complete(&json!({"mode": "prelevement", "montant": 500,
                                     "rib_id": "FR1420041010050500013M02606"}),
                             None)
                   .expect("complete");
  ctl.advance("paiement", result).expect("advance");
  ctl.commit().await.expect("commit");
  let body = &backend.commits_for("ventes")[0].body;
  assert_eq!(body["mode_paiement"], json!("prelevement"));
  assert_eq!(body["rib_id"], json!("FR1420041010050500013M02606"));
}

#[tokio::test]
async fn inactive_products_are_not_sellable() {
  let (_backend, _notifier, _ctl, flow_ctx, mut forms) = harness();
  let form = forms.iter_mut().find(|f| f.step_id() == "selection").expect("formulario");
  form.mount(&flow_ctx).await.expect("mount");

  // P6 está desactivado: el catálogo montado no lo incluye
  assert!(form.complete(&json!({"produit_id": "P6", "quantite": 1}), None).is_err());
  assert!(form.complete(&json!({"produit_id": "P1", "quantite": 0}), None).is_err());
  assert!(form.complete(&json!({"produit_id": "P1", "quantite": 1, "remise_pct": 120}), None).is_err());
}
