//! Application state module

mod app_state;
pub mod auth_gate;
pub mod auth_input;
pub mod drafts;
mod forms;
pub mod submission;
mod validation;
pub mod wizard;

pub use app_state::*;
pub use drafts::{DraftStore, FileDraftStore};
pub use forms::*;
pub use submission::{ReviewController, SubmitOutcome};
pub use wizard::{StepController, StepOutcome, WizardStep};
