//! opera-workflow: los flujos de negocio de Opera como configuración
//!
//! Este crate traduce los cuatro asistentes de la administración del club
//! (vente, transfert, résiliation, alta de RIB) al controlador genérico de
//! `wizard`: cada flujo es una `WorkflowDefinition` (pasos + validadores +
//! esquema canónico de confirmación) más un juego de formularios de paso
//! (`StepForm`) que validan sus campos y consultan sus datos de referencia.
//! Ninguno duplica lógica de secuenciación: eso lo interpreta el
//! controlador.
//!
//! Capas:
//! - `step`: el contrato de formulario (`StepForm`), el contexto de flujo
//!   con acceso tipado al proveedor de referencia (`FlowContext`) y el paso
//!   terminal compartido (`ConfirmationForm`).
//! - `flows`: un módulo por flujo con sus payloads tipados, su shaper (el
//!   único lugar donde se resuelve el esquema de confirmación) y su
//!   definición.
//! - `factory`: resolución de `WorkflowType` → definición/formularios y
//!   apertura de controladores, incluida la variante cableada al backend
//!   REST del entorno.
pub mod errors;
pub mod factory;
pub mod flows;
pub mod step;
pub mod workflow_type;

pub use errors::WorkflowError;
pub use factory::OperaWorkflowFactory;
pub use step::{overlay_defaults, ConfirmationForm, FlowContext, StepForm};
pub use workflow_type::WorkflowType;
