// src/ui/mod.rs

use crate::app::App;
use crate::core::models::WizardStep;
use ratatui::prelude::*;

mod layout;
mod widgets;

pub fn render(app: &mut App, frame: &mut Frame) {
    let has_error = app.controller.last_error().is_some();
    let layout = layout::create_layout(frame.area(), has_error);

    widgets::progress::render_progress(frame, app, layout.header);
    if has_error {
        widgets::error_banner::render_error_banner(frame, app, layout.error);
    }

    match app.controller.step() {
        WizardStep::SelectModel | WizardStep::SelectEnvironment => {
            widgets::selection::render_catalog_step(frame, app, layout.body)
        }
        WizardStep::SelectTool => widgets::tool_step::render_tool_step(frame, app, layout.body),
        WizardStep::Running => widgets::running_view::render_running_view(frame, app, layout.body),
    }

    widgets::footer::render_footer(frame, app, layout.footer);
}
