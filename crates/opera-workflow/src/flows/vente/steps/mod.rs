pub mod paiement;
pub mod selection;

pub use paiement::{PaiementForm, PaiementPayload};
pub use selection::{SelectionForm, SelectionPayload};
