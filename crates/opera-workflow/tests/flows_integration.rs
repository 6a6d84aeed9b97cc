use opera_gateway::InMemoryBackend;
use opera_workflow::{FlowContext, OperaWorkflowFactory, StepForm, WorkflowType};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use wizard::stubs::RecordingNotifier;
use wizard::WizardController;

fn open(kind: WorkflowType, context: JsonValue) -> (Arc<InMemoryBackend>, WizardController, FlowContext, Vec<Box<dyn StepForm>>) {
  let backend = Arc::new(InMemoryBackend::seeded());
  let ctl = OperaWorkflowFactory::open(kind, context.clone(), backend.clone(), Arc::new(RecordingNotifier::new()))
    .expect("apertura");
  let flow_ctx = FlowContext::new(context, backend.clone());
  let forms = OperaWorkflowFactory::forms(kind).expect("formularios");
  (backend, ctl, flow_ctx, forms)
}

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
async fn transfert_commits_with_the_canonical_schema() {
  let (backend, mut ctl, flow_ctx, mut forms) = open(WorkflowType::Transfert, json!({"client_id": "C1"}));

  fill(&mut ctl, &mut forms, &flow_ctx, "cible", json!({"cible_id": "C2"})).await;
  fill(&mut ctl,
       &mut forms,
       &flow_ctx,
       "modalites",
       json!({"date_effet": "2026-09-01", "motif": "déménagement"})).await;
  ctl.commit().await.expect("commit");

  let body = &backend.commits_for("transferts")[0].body;
  assert_eq!(body["client_id"], json!("C1"));
  assert_eq!(body["cible_id"], json!("C2"));
  assert_eq!(body["cible_nom"], json!("Karim Benali"));
  assert_eq!(body["date_effet"], json!("2026-09-01"));
  assert_eq!(body["motif"], json!("déménagement"));
}

#[tokio::test]
async fn transfert_rejects_the_source_client_as_target() {
  let (_backend, _ctl, flow_ctx, mut forms) = open(WorkflowType::Transfert, json!({"client_id": "C1"}));
  let form = forms.iter_mut().find(|f| f.step_id() == "cible").expect("formulario");
  form.mount(&flow_ctx).await.expect("mount");

  assert!(form.complete(&json!({"cible_id": "C1"}), None).is_err());
  assert!(form.complete(&json!({"cible_id": "C999"}), None).is_err());
  assert!(form.complete(&json!({"cible_id": "C2"}), None).is_ok());
}

#[tokio::test]
async fn resiliation_commits_with_context_abonnement_and_default_frais() {
  let context = json!({"client_id": "C3", "abonnement_id": "A42"});
  let (backend, mut ctl, flow_ctx, mut forms) = open(WorkflowType::Resiliation, context);

  // sin frais en pantalla → 0 por defecto
  fill(&mut ctl,
       &mut forms,
       &flow_ctx,
       "motif",
       json!({"motif": "changement de ville", "date_effet": "2026-10-31"})).await;
  assert_eq!(ctl.current_step(), "confirmation");
  ctl.commit().await.expect("commit");

  let body = &backend.commits_for("resiliations")[0].body;
  assert_eq!(body["client_id"], json!("C3"));
  assert_eq!(body["abonnement_id"], json!("A42"));
  assert_eq!(body["motif"], json!("changement de ville"));
  assert_eq!(body["date_effet"], json!("2026-10-31"));
  assert_eq!(body["frais"], json!(0.0));
}

#[tokio::test]
async fn resiliation_without_abonnement_omits_the_field() {
  let (backend, mut ctl, flow_ctx, mut forms) = open(WorkflowType::Resiliation, json!({"client_id": "C3"}));
  fill(&mut ctl,
       &mut forms,
       &flow_ctx,
       "motif",
       json!({"motif": "impayés", "date_effet": "2026-09-15", "frais": "25.50"})).await;
  ctl.commit().await.expect("commit");

  let body = &backend.commits_for("resiliations")[0].body;
  assert!(body.get("abonnement_id").is_none());
  assert_eq!(body["frais"], json!(25.5));
}

#[tokio::test]
async fn rib_flow_normalizes_and_commits_the_mandate() {
  let (backend, mut ctl, flow_ctx, mut forms) = open(WorkflowType::Rib, json!({"client_id": "C4"}));

  fill(&mut ctl,
       &mut forms,
       &flow_ctx,
       "saisie",
       json!({"titulaire": "Giulia Rossi", "banque": "Société Générale",
              "iban": "fr14 2004 1010 0505 0001 3m02 606", "bic": "sogefrpp"})).await;
  fill(&mut ctl,
       &mut forms,
       &flow_ctx,
       "mandat",
       json!({"date_signature": "2026-08-27", "recurrent": "oui"})).await;
  ctl.commit().await.expect("commit");

  let body = &backend.commits_for("ribs")[0].body;
  assert_eq!(body["client_id"], json!("C4"));
  assert_eq!(body["iban"], json!("FR1420041010050500013M02606"));
  assert_eq!(body["bic"], json!("SOGEFRPP"));
  assert_eq!(body["date_signature"], json!("2026-08-27"));
  assert_eq!(body["recurrent"], json!(true));
}

#[tokio::test]
async fn rib_saisie_rejects_invalid_coordinates_inline() {
  let (_backend, _ctl, flow_ctx, mut forms) = open(WorkflowType::Rib, json!({"client_id": "C4"}));
  let form = forms.iter_mut().find(|f| f.step_id() == "saisie").expect("formulario");
  form.mount(&flow_ctx).await.expect("mount");

  // checksum alterado
  assert!(form.complete(&json!({"titulaire": "G", "banque": "SG",
                                "iban": "FR1420041010050500013M02607", "bic": "SOGEFRPP"}),
                        None)
              .is_err());
  // BIC de 6 caracteres
  assert!(form.complete(&json!({"titulaire": "G", "banque": "SG",
                                "iban": "FR1420041010050500013M02606", "bic": "SOGEFR"}),
                        None)
              .is_err());
}

#[tokio::test]
async fn provider_failure_blocks_mount_and_a_retry_recovers_the_step() {
  let (backend, _ctl, flow_ctx, mut forms) = open(WorkflowType::Vente, json!({"client_id": "C1"}));
  let form = forms.iter_mut().find(|f| f.step_id() == "selection").expect("formulario");

  backend.fail_next_list();
  assert!(form.mount(&flow_ctx).await.is_err());

  // el reintento es a nivel de paso: el mismo formulario vuelve a montar
  form.mount(&flow_ctx).await.expect("reintento");
  assert!(form.complete(&json!({"produit_id": "P1", "quantite": 1}), None).is_ok());
}

#[tokio::test]
async fn go_back_prefills_and_readvance_replaces_the_namespace() {
  let (_backend, mut ctl, flow_ctx, mut forms) = open(WorkflowType::Vente, json!({"client_id": "C1"}));
  fill(&mut ctl,
       &mut forms,
       &flow_ctx,
       "selection",
       json!({"produit_id": "P1", "quantite": 2, "remise_pct": 10})).await;

  ctl.go_back().expect("retrocede");
  // el namespace abandonado sigue ahí para pre-rellenar
  let prior = ctl.prior("selection").cloned().expect("pre-relleno");
  assert_eq!(prior["quantite"], json!(2));

  // reenvío parcial: solo cambia la cantidad, el resto cae al previo
  let form = forms.iter_mut().find(|f| f.step_id() == "selection").expect("formulario");
  let result = form.complete(&json!({"quantite": 3}), Some(&prior)).expect("complete");
  ctl.advance("selection", result).expect("re-avanza");

  let replaced = ctl.prior("selection").expect("namespace");
  assert_eq!(replaced["quantite"], json!(3));
  assert_eq!(replaced["remise_pct"], json!(10.0));
  // 3 × 500 × 0.9
  assert_eq!(replaced["total"], json!(1350.0));
}

#[test]
fn factory_definitions_resolve_and_reclone_for_every_kind() {
  for kind in WorkflowType::all() {
    let first = OperaWorkflowFactory::definition(kind).expect("definición");
    // segunda resolución: clon independiente de la caché del proceso
    let again = OperaWorkflowFactory::definition(kind).expect("clon de la caché");
    assert_eq!(first.kind(), kind.to_string());
    assert_eq!(again.len(), first.len());
    assert!(first.is_terminal("confirmation"));
  }
}

#[test]
fn unknown_workflow_strings_are_rejected_by_the_factory() {
  let kind: WorkflowType = "avoir".parse().unwrap();
  assert_eq!(kind, WorkflowType::Unknown);
  assert!(OperaWorkflowFactory::definition(kind).is_err());
  assert!(OperaWorkflowFactory::forms(kind).is_err());

  let kind: WorkflowType = "résiliation".parse().unwrap();
  assert_eq!(kind, WorkflowType::Resiliation);
  assert!(OperaWorkflowFactory::definition(kind).is_ok());
}
