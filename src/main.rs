use anyhow::Result;
use opera_gateway::InMemoryBackend;
use opera_workflow::{ConfirmationForm, FlowContext, OperaWorkflowFactory, WorkflowType};
use serde_json::{json, Map, Value as JsonValue};
use std::io::{self, Write};
use std::sync::Arc;
use wizard::stubs::ConsoleNotifier;

/// Pequeño menú interactivo para recorrer los asistentes de Opera contra
/// el backend en memoria sembrado con los datos de muestra.
///
/// Opciones soportadas:
/// 1) Ver clientes
/// 2) Nouvelle vente
/// 3) Transfert d'abonnement
/// 4) Résiliation
/// 5) Ajouter un RIB
/// 6) Ver confirmaciones registradas
/// 7) Salir
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let backend = Arc::new(InMemoryBackend::seeded());

    loop {
        println!("\n== Opera — menú de administración ==");
        println!("1) Ver clientes");
        println!("2) Nouvelle vente");
        println!("3) Transfert d'abonnement");
        println!("4) Résiliation");
        println!("5) Ajouter un RIB");
        println!("6) Ver confirmaciones registradas");
        println!("7) Salir");

        match prompt("Elige una opción: ")?.as_str() {
            "1" => show_clients(&backend).await,
            "2" => run_workflow(WorkflowType::Vente, &backend).await?,
            "3" => run_workflow(WorkflowType::Transfert, &backend).await?,
            "4" => run_workflow(WorkflowType::Resiliation, &backend).await?,
            "5" => run_workflow(WorkflowType::Rib, &backend).await?,
            "6" => show_commits(&backend),
            "7" => break,
            other => println!("Opción desconocida: '{}'", other),
        }
    }
    Ok(())
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn show_clients(backend: &Arc<InMemoryBackend>) {
    use wizard::DataProvider;
    match backend.list("clients", &json!({})).await {
        Ok(clients) => {
            println!("\nID  | CLIENT");
            println!("----------------------------");
            for c in clients {
                println!("{:3} | {} {}", text(&c["id"]), text(&c["prenom"]), text(&c["nom"]));
            }
        }
        Err(e) => eprintln!("Error listando clientes: {}", e),
    }
}

fn show_commits(backend: &Arc<InMemoryBackend>) {
    let commits = backend.commits();
    if commits.is_empty() {
        println!("\n(ninguna confirmación registrada todavía)");
        return;
    }
    println!("\nConfirmaciones registradas:");
    for (resource, request) in commits {
        println!("  /{} ← {}", resource, request.body);
    }
}

/// Abre el asistente del flujo indicado y lo conduce paso a paso: montar
/// el formulario (con reintento si el proveedor falla), pedir los campos,
/// completar y avanzar; en el paso terminal, resumen + confirmación con
/// reintento tras un rechazo. Escribir `b` en un campo vuelve atrás y los
/// formularios re-visitados llegan pre-rellenos del namespace conservado.
async fn run_workflow(kind: WorkflowType, backend: &Arc<InMemoryBackend>) -> Result<()> {
    let client_id = prompt("Cliente (id, ej. C1): ")?;
    if client_id.is_empty() {
        println!("Se necesita un cliente.");
        return Ok(());
    }
    let mut context = json!({ "client_id": client_id });
    if kind == WorkflowType::Resiliation {
        let abonnement = prompt("Abonnement (id, enter para el vigente): ")?;
        if !abonnement.is_empty() {
            context["abonnement_id"] = json!(abonnement);
        }
    }

    let mut ctl = match OperaWorkflowFactory::open(kind, context.clone(), backend.clone(), Arc::new(ConsoleNotifier)) {
        Ok(ctl) => ctl,
        Err(e) => {
            eprintln!("No se pudo abrir el asistente: {}", e);
            return Ok(());
        }
    };
    let flow_ctx = FlowContext::new(context, backend.clone());
    let mut forms = OperaWorkflowFactory::forms(kind)?;

    loop {
        let step = ctl.current_step().to_string();
        let (pos, total) = ctl.progress();

        if ctl.definition().is_terminal(&step) {
            println!("\n-- Paso {}/{}: confirmation --", pos, total);
            for line in ConfirmationForm::recap(ctl.definition(), ctl.instance().data()) {
                println!("   {}", line);
            }
            match prompt("c = confirmar, b = atrás, q = cancelar: ")?.as_str() {
                "c" => match ctl.commit().await {
                    Ok(outcome) if outcome.should_close() => return Ok(()),
                    // rechazo: el notificador ya avisó; la instancia sigue
                    // abierta para reintentar o retroceder
                    Ok(_) => {}
                    Err(e) => println!("❌ {}", e),
                },
                "b" => {
                    if let Err(e) = ctl.go_back() {
                        println!("❌ {}", e);
                    }
                }
                _ => {
                    ctl.cancel();
                    println!("Asistente cancelado; no se confirmó nada.");
                    return Ok(());
                }
            }
            continue;
        }

        let title = ctl.definition().step(&step).map(|s| s.title.clone()).unwrap_or_else(|| step.clone());
        println!("\n-- Paso {}/{}: {} --", pos, total, title);
        let form = forms.iter_mut().find(|f| f.step_id() == step).expect("formulario del paso");

        // datos de referencia del paso, con reintento a nivel de paso
        loop {
            match form.mount(&flow_ctx).await {
                Ok(()) => break,
                Err(e) => {
                    println!("❌ {}", e);
                    if prompt("r = reintentar, otra tecla = cancelar: ")? != "r" {
                        ctl.cancel();
                        return Ok(());
                    }
                }
            }
        }

        match prompt_step_input(&step, &flow_ctx).await? {
            None => {
                // `b` en un campo: atrás, o cancelación desde el primer paso
                if ctl.go_back().is_err() {
                    ctl.cancel();
                    println!("Asistente cancelado; no se confirmó nada.");
                    return Ok(());
                }
            }
            Some(input) => {
                let prior = ctl.prior(&step).cloned();
                match form.complete(&input, prior.as_ref()) {
                    Ok(result) => {
                        if let Some(summary) = result.summary() {
                            println!("   ✔ {}", summary);
                        }
                        if let Err(e) = ctl.advance(&step, result) {
                            println!("❌ {}", e);
                        }
                    }
                    // error local del paso: se muestra en línea y se vuelve
                    // a pedir, sin tocar el acumulado
                    Err(e) => println!("❌ {}", e),
                }
            }
        }
    }
}

/// Pide por consola los campos del paso indicado. Devuelve `None` si el
/// usuario escribió `b` (volver atrás); los campos dejados en blanco no
/// viajan, así que el pre-relleno del namespace previo decide su valor.
async fn prompt_step_input(step: &str, flow_ctx: &FlowContext) -> Result<Option<JsonValue>> {
    let mut fields = Map::new();
    let filled = match step {
        "selection" => {
            show_reference(flow_ctx, "produits", &json!({"actif": true}), |p| {
                format!("{} — {} ({} €)", text(&p["id"]), text(&p["libelle"]), p["prix_unitaire"])
            }).await;
            ask(&mut fields, "produit_id", "Produit (id): ")?
                && ask(&mut fields, "quantite", "Quantité: ")?
                && ask(&mut fields, "remise_pct", "Remise % (enter = 0): ")?
        }
        "paiement" => {
            ask(&mut fields, "mode", "Mode (especes/cheque/carte/prelevement): ")?
                && ask(&mut fields, "montant", "Montant: ")?
                && ask(&mut fields, "rib_id", "RIB (IBAN, solo prélèvement): ")?
        }
        "cible" => {
            show_reference(flow_ctx, "clients", &json!({}), |c| {
                format!("{} — {} {}", text(&c["id"]), text(&c["prenom"]), text(&c["nom"]))
            }).await;
            ask(&mut fields, "cible_id", "Cliente destino (id): ")?
        }
        "modalites" => {
            ask(&mut fields, "date_effet", "Date d'effet (AAAA-MM-JJ): ")?
                && ask(&mut fields, "motif", "Motif (opcional): ")?
        }
        "motif" => {
            ask(&mut fields, "motif", "Motif: ")?
                && ask(&mut fields, "date_effet", "Date d'effet (AAAA-MM-JJ): ")?
                && ask(&mut fields, "frais", "Frais (enter = 0): ")?
        }
        "saisie" => {
            ask(&mut fields, "titulaire", "Titulaire: ")?
                && ask(&mut fields, "banque", "Banque: ")?
                && ask(&mut fields, "iban", "IBAN: ")?
                && ask(&mut fields, "bic", "BIC: ")?
        }
        "mandat" => {
            ask(&mut fields, "date_signature", "Date de signature (AAAA-MM-JJ): ")?
                && ask(&mut fields, "recurrent", "¿Mandat récurrent? (oui/non): ")?
        }
        other => {
            println!("(paso sin campos conocidos: {})", other);
            true
        }
    };
    Ok(if filled { Some(JsonValue::Object(fields)) } else { None })
}

/// Un campo de formulario: en blanco no viaja, `b` corta para volver atrás.
fn ask(fields: &mut Map<String, JsonValue>, key: &str, label: &str) -> Result<bool> {
    let value = prompt(label)?;
    if value == "b" {
        return Ok(false);
    }
    if !value.is_empty() {
        fields.insert(key.to_string(), json!(value));
    }
    Ok(true)
}

async fn show_reference<F>(flow_ctx: &FlowContext, resource: &str, filter: &JsonValue, line: F)
    where F: Fn(&JsonValue) -> String
{
    if let Ok(items) = flow_ctx.list(resource, filter).await {
        for item in &items {
            println!("   {}", line(item));
        }
    }
}

fn text(value: &JsonValue) -> &str {
    value.as_str().unwrap_or("?")
}
