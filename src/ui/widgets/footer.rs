// src/ui/widgets/footer.rs

use crate::app::App;
use crate::core::models::WizardStep;
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

fn key(label: &str) -> Span<'_> {
    Span::styled(label, Style::new().bold().fg(Color::Yellow))
}

/// Renders the footer, listing only the actions valid right now.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let mut spans: Vec<Span> = Vec::new();

    match controller.step() {
        WizardStep::SelectModel | WizardStep::SelectEnvironment => {
            spans.extend([key("↑↓"), Span::raw(" move  "), key("Enter"), Span::raw(" select  ")]);
            if controller.can_advance() {
                spans.extend([key("→"), Span::raw(" next  ")]);
            }
            if controller.can_retreat() {
                spans.extend([key("←"), Span::raw(" back  ")]);
            }
            spans.extend([key("R"), Span::raw("eload  ")]);
        }
        WizardStep::SelectTool if app.is_editing_directory() => {
            spans.extend([Span::raw("Type the path  "), key("Enter"), Span::raw(" start scan  "), key("Tab"), Span::raw(" tools")]);
        }
        WizardStep::SelectTool => {
            if controller.is_launching() {
                spans.push(Span::raw("Starting... "));
            } else {
                spans.extend([key("↑↓"), Span::raw(" move  "), key("Enter"), Span::raw(" select  ")]);
                if controller.config().tool.is_some() {
                    spans.extend([key("Tab"), Span::raw(" switch panel  ")]);
                }
                spans.extend([key("S"), Span::raw("tart scan  "), key("←"), Span::raw(" back  ")]);
            }
        }
        WizardStep::Running => {
            spans.extend([key("↑↓"), Span::raw(" scroll  "), key("End"), Span::raw(" follow  ")]);
            if controller.is_scanning() {
                spans.extend([key("N"), Span::raw("ew scan (aborts)  ")]);
            } else {
                spans.extend([key("N"), Span::raw("ew scan  "), key("←"), Span::raw(" back  ")]);
            }
        }
    }
    if !app.is_editing_directory() {
        spans.extend([key("Q"), Span::raw("uit")]);
    }

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
