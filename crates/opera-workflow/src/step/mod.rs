mod confirmation;
mod context;
mod form;

pub use confirmation::ConfirmationForm;
pub use context::{overlay_defaults, FlowContext};
pub use form::StepForm;
