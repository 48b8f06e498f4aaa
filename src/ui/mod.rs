//! UI module for rendering the TUI

mod components;
mod forms;
mod home;
mod layout;
mod review;

use crate::app::App;
use crate::state::Page;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    // Draw main content based on the current page
    match &app.state.page {
        // Gated pages stay blank until the session resolves
        Page::Loading(_) => {}
        Page::Home => home::draw(frame, main_area, app),
        Page::Login(form) | Page::Register(form) => forms::draw_auth_form(frame, main_area, form),
        Page::BasicInfo(controller) => forms::draw_step(frame, main_area, controller),
        Page::AdditionalDetails(controller) => forms::draw_step(frame, main_area, controller),
        Page::Confirmation(review) => review::draw(frame, main_area, review),
    }

    layout::draw_status_bar(frame, status_area, app);

    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message);
    }
}
