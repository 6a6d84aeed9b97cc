//! opera-gateway: colaboradores concretos del controlador de asistentes
//!
//! Dos implementaciones de los contratos de `wizard::collaborators`:
//!
//! - `HttpGateway`: pasarela REST/JSON hacia el backend de Opera,
//!   configurada desde el entorno (`OPERA_API_URL`, token y timeout).
//! - `memory::InMemoryBackend`: backend sembrable en memoria para demos y
//!   pruebas de integración, con libro de confirmaciones y fallos
//!   guionables.
//!
//! La pasarela normaliza todo fallo de confirmación (transporte o negocio)
//! en un `CommitAck` con `success == false`; los errores tipados de
//! `GatewayError` solo aparecen en la construcción y en las consultas de
//! datos de referencia.

pub mod config;
pub mod errors;
pub mod http;
pub mod memory;

pub use config::GatewayConfig;
pub use errors::GatewayError;
pub use http::{resource_for_workflow, HttpGateway};
pub use memory::InMemoryBackend;
