// Archivo: definition.rs
// Propósito: describir un workflow como secuencia ordenada de pasos con
// nombre. La definición es datos puros: el controlador (`controller.rs`)
// la interpreta y los flujos concretos la construyen vía `DefinitionBuilder`.
use crate::errors::{Result, WizardError};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

/// Validador local declarado por un paso. Recibe el payload propuesto y
/// devuelve un mensaje de error legible cuando el payload no cumple las
/// reglas del paso. No realiza I/O.
pub type StepValidator = fn(&JsonValue) -> std::result::Result<(), String>;

/// Función que convierte (contexto inicial, datos acumulados) en el cuerpo
/// de la solicitud de confirmación. Debe ser determinista: mismo acumulado,
/// mismo cuerpo. Los flujos concretos definen aquí su esquema explícito.
pub type CommitShaper = fn(&JsonValue, &Map<String, JsonValue>) -> Result<JsonValue>;

/// Un paso con nombre dentro de la definición.
#[derive(Debug, Clone)]
pub struct StepDef {
    /// Identificador estable del paso (clave del namespace de datos).
    pub id: String,
    /// Título legible para mostrar en el indicador de progreso.
    pub title: String,
    /// Reglas locales del paso, si declara alguna.
    pub validate: Option<StepValidator>,
}

/// Definición de un workflow: secuencia total de pasos con exactamente un
/// paso inicial (el primero) y uno terminal (el último). Sin ciclos: el
/// orden de inserción es el único orden de avance y `go_back` lo recorre
/// en sentido inverso.
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    kind: String,
    steps: IndexMap<String, StepDef>,
    shaper: Option<CommitShaper>,
}

impl WorkflowDefinition {
    /// Punto de entrada para construir una definición paso a paso.
    pub fn builder(kind: &str) -> DefinitionBuilder {
        DefinitionBuilder { kind: kind.to_string(),
                            steps: Vec::new(),
                            shaper: None }
    }

    /// Nombre del tipo de workflow (vente, transfert, ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Id del paso inicial (el primero de la secuencia).
    pub fn initial(&self) -> Option<&str> {
        self.steps.keys().next().map(String::as_str)
    }

    /// Id del paso terminal (el último de la secuencia).
    pub fn terminal(&self) -> Option<&str> {
        self.steps.keys().last().map(String::as_str)
    }

    /// Indica si `step_id` es el paso terminal.
    pub fn is_terminal(&self, step_id: &str) -> bool {
        self.terminal() == Some(step_id)
    }

    /// Id del paso siguiente a `step_id`, o `None` si es el terminal o no
    /// pertenece a la definición.
    pub fn next_after(&self, step_id: &str) -> Option<&str> {
        let idx = self.steps.get_index_of(step_id)?;
        self.steps.get_index(idx + 1).map(|(k, _)| k.as_str())
    }

    /// Id del paso anterior a `step_id`, o `None` si es el inicial o no
    /// pertenece a la definición.
    pub fn prev_before(&self, step_id: &str) -> Option<&str> {
        let idx = self.steps.get_index_of(step_id)?;
        if idx == 0 {
            return None;
        }
        self.steps.get_index(idx - 1).map(|(k, _)| k.as_str())
    }

    /// Posición (base 0) de un paso dentro de la secuencia.
    pub fn position(&self, step_id: &str) -> Option<usize> {
        self.steps.get_index_of(step_id)
    }

    /// Acceso a la declaración de un paso.
    pub fn step(&self, step_id: &str) -> Option<&StepDef> {
        self.steps.get(step_id)
    }

    /// Ids de los pasos en orden de avance.
    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    /// Cantidad de pasos de la definición.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Indica si la definición no tiene pasos (imposible tras `build`).
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Construye el cuerpo de la solicitud de confirmación a partir del
    /// contexto inicial y de los datos acumulados. Si el flujo declaró un
    /// `shaper` se usa su esquema explícito; si no, se emite la forma
    /// genérica `{ "context": ..., "steps": { namespace: payload } }`.
    ///
    /// En ambos casos el resultado depende únicamente de los argumentos,
    /// nunca del reloj ni de estado externo.
    pub fn shape(&self, context: &JsonValue, data: &Map<String, JsonValue>) -> Result<JsonValue> {
        match self.shaper {
            Some(shaper) => shaper(context, data),
            None => {
                let mut body = Map::new();
                body.insert("context".to_string(), context.clone());
                body.insert("steps".to_string(), JsonValue::Object(data.clone()));
                Ok(JsonValue::Object(body))
            }
        }
    }
}

/// Builder de definiciones. Acumula pasos en orden y valida la secuencia
/// completa en `build`.
pub struct DefinitionBuilder {
    kind: String,
    steps: Vec<StepDef>,
    shaper: Option<CommitShaper>,
}

impl DefinitionBuilder {
    /// Añade un paso sin reglas locales.
    pub fn step(self, id: &str, title: &str) -> Self {
        self.push(StepDef { id: id.to_string(),
                            title: title.to_string(),
                            validate: None })
    }

    /// Añade un paso con un validador local.
    pub fn step_with(self, id: &str, title: &str, validate: StepValidator) -> Self {
        self.push(StepDef { id: id.to_string(),
                            title: title.to_string(),
                            validate: Some(validate) })
    }

    /// Declara el esquema explícito de confirmación del flujo.
    pub fn shaper(mut self, shaper: CommitShaper) -> Self {
        self.shaper = Some(shaper);
        self
    }

    fn push(mut self, step: StepDef) -> Self {
        self.steps.push(step);
        self
    }

    /// Valida la secuencia y produce la definición.
    ///
    /// Reglas:
    /// - el tipo de workflow no puede estar vacío;
    /// - debe haber al menos un paso (con uno solo, inicial == terminal);
    /// - los ids de paso no pueden estar vacíos ni repetirse.
    pub fn build(self) -> Result<WorkflowDefinition> {
        if self.kind.trim().is_empty() {
            return Err(WizardError::Definition("el tipo de workflow no puede estar vacío".into()));
        }
        if self.steps.is_empty() {
            return Err(WizardError::Definition(format!("'{}' no declara ningún paso", self.kind)));
        }
        let mut steps: IndexMap<String, StepDef> = IndexMap::with_capacity(self.steps.len());
        for step in self.steps {
            if step.id.trim().is_empty() {
                return Err(WizardError::Definition(format!("'{}' declara un paso con id vacío", self.kind)));
            }
            let id = step.id.clone();
            if steps.insert(id.clone(), step).is_some() {
                return Err(WizardError::Definition(format!("'{}' repite el id de paso '{}'", self.kind, id)));
            }
        }
        Ok(WorkflowDefinition { kind: self.kind,
                                steps,
                                shaper: self.shaper })
    }
}
