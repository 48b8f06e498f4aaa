//! Form rendering module
//!
//! - `field_renderer`: boxed field drawing shared by every form
//! - `listing_form`: the wizard's data-entry steps
//! - `auth_form`: login and register

mod auth_form;
mod field_renderer;
mod listing_form;

pub use auth_form::draw_auth_form;
pub use field_renderer::draw_help_text;
pub use listing_form::{draw_step, step_heading};
