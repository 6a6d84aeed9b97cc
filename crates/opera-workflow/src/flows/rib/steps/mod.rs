pub mod mandat;
pub mod saisie;

pub use mandat::{MandatForm, MandatPayload};
pub use saisie::{SaisieForm, SaisiePayload};
