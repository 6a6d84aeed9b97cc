pub mod motif;

pub use motif::{MotifForm, MotifPayload};
