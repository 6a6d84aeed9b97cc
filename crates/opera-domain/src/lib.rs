//! opera-domain: tipos de negocio del club Opera
//!
//! Crate de dominio puro: clientes, productos, RIBs y modos de pago con
//! constructores validadores, más la aritmética de tarifas. No hay I/O ni
//! dependencia de los workflows; los crates de flujo consumen estos tipos
//! para validar los pasos y dar forma a las confirmaciones.

mod client;
mod errors;
mod paiement;
mod produit;
mod rib;
mod samples;
pub mod tarif;

pub use client::Client;
pub use errors::DomainError;
pub use paiement::ModePaiement;
pub use produit::Produit;
pub use rib::Rib;
pub use samples::Samples;
