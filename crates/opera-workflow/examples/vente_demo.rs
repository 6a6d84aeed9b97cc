// Ejemplo guionado de una venta completa contra el backend en memoria:
// apertura, sélection, paiement, rechazo simulado del backend y reintento.
//
// Ejecutar con: cargo run -p opera-workflow --example vente_demo
use opera_gateway::InMemoryBackend;
use opera_workflow::{ConfirmationForm, FlowContext, OperaWorkflowFactory, WorkflowType};
use serde_json::json;
use std::sync::Arc;
use wizard::stubs::ConsoleNotifier;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let backend = Arc::new(InMemoryBackend::seeded());
  let context = json!({"client_id": "C1"});

  let mut ctl =
    OperaWorkflowFactory::open(WorkflowType::Vente, context.clone(), backend.clone(), Arc::new(ConsoleNotifier))?;
  let flow_ctx = FlowContext::new(context, backend.clone());
  let mut forms = OperaWorkflowFactory::forms(WorkflowType::Vente)?;

  println!("== Nouvelle vente para C1 ==");

  // Paso 1: sélection (2 × Pack découverte con 10% de remise)
  let selection = forms.iter_mut().find(|f| f.step_id() == "selection").unwrap();
  selection.mount(&flow_ctx).await?;
  let result = selection.complete(&json!({"produit_id": "P3", "quantite": 2, "remise_pct": 10}), None)?;
  println!("  sélection: {}", result.summary().unwrap_or("-"));
  ctl.advance("selection", result)?;

  // Paso 2: paiement en espèces
  let paiement = forms.iter_mut().find(|f| f.step_id() == "paiement").unwrap();
  paiement.mount(&flow_ctx).await?;
  let result = paiement.complete(&json!({"mode": "especes", "montant": 540}), None)?;
  println!("  paiement: {}", result.summary().unwrap_or("-"));
  ctl.advance("paiement", result)?;

  // Paso 3: confirmación, con un rechazo del backend y el reintento
  println!("  resumen:");
  for line in ConfirmationForm::recap(ctl.definition(), ctl.instance().data()) {
    println!("    {}", line);
  }
  backend.fail_next_commit();
  let outcome = ctl.commit().await?;
  println!("  primer intento: {:?}", outcome);
  let outcome = ctl.commit().await?;
  println!("  reintento: {:?}", outcome);

  println!("\nConfirmaciones registradas en el backend:");
  for (resource, request) in backend.commits() {
    println!("  /{} ← {}", resource, request.body);
  }
  Ok(())
}
