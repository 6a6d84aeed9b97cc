//! Crate `wizard` — controlador genérico de asistentes multi-paso
//!
//! Este crate define la definición de un workflow (`WorkflowDefinition`,
//! secuencia ordenada de pasos con nombre), el estado en memoria de una
//! instancia en curso (`WorkflowInstance`, datos acumulados por namespace)
//! y el controlador que interpreta ambas cosas (`WizardController`). Los
//! efectos externos pasan por los contratos de `collaborators`: commit,
//! notificaciones y datos de referencia.
//!
//! Diseño resumido:
//! - Un solo controlador para todos los flujos: cada flujo concreto es solo
//!   configuración (pasos + validadores + esquema de confirmación).
//! - Los datos acumulados solo crecen o se reemplazan por namespace; volver
//!   atrás no borra nada (sirve de pre-relleno).
//! - La confirmación es determinista a partir del acumulado, llama al
//!   colaborador exactamente una vez y nunca reintenta por su cuenta.
//!
//! Ejemplo rápido:
//! ```rust
//! use std::sync::Arc;
//! use wizard::{StepResult, WizardController, WorkflowDefinition};
//! use wizard::stubs::{RecordingNotifier, StubCommit};
//!
//! let definition = WorkflowDefinition::builder("demo")
//!     .step("datos", "Datos")
//!     .step("confirmation", "Confirmation")
//!     .build()
//!     .expect("definición válida");
//! let mut ctl = WizardController::start(definition,
//!                                       serde_json::json!({"client_id": "C1"}),
//!                                       Arc::new(StubCommit::new()),
//!                                       Arc::new(RecordingNotifier::new()))
//!     .expect("instancia inicial");
//! ctl.advance("datos", StepResult::new(serde_json::json!({"x": 1}))).expect("avanza");
//! assert_eq!(ctl.current_step(), "confirmation");
//! ```
pub mod collaborators;
pub mod controller;
pub mod definition;
pub mod errors;
pub mod instance;
pub mod stubs;

pub use collaborators::*;
pub use controller::*;
pub use definition::*;
pub use errors::*;
pub use instance::*;
pub use stubs::*;
