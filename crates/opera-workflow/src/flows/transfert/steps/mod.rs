pub mod cible;
pub mod modalites;

pub use cible::{CibleForm, CiblePayload};
pub use modalites::{ModalitesForm, ModalitesPayload};
