// src/ui/widgets/running_view.rs

use crate::app::{App, SPINNER_CHARS};
use crate::core::models::ToolSelection;
use crate::core::relay::RelayState;
use crate::ui::layout::split_top;
use crate::ui::widgets::output_view;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Renders the running step: what was launched, the channel status and the
/// live output below.
pub fn render_running_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let (details_area, output_area) = split_top(area, 7);
    render_details(frame, app, details_area);
    output_view::render_output_view(frame, app, output_area);
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Running Scan".bold());
    let controller = &app.controller;

    let Some(session) = controller.session() else {
        frame.render_widget(Paragraph::new("No active session.").block(block), area);
        return;
    };
    let config = &session.configuration;

    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name}: "), Style::new().bold()), Span::raw(value)])
    };
    let mut lines = vec![
        field("Model", config.model.clone()),
        field("Environment", config.environment.clone()),
        field("Tool", config.tool.map(|t| t.to_string()).unwrap_or_default()),
    ];
    match config.tool {
        Some(ToolSelection::Garak) => lines.push(field("Probes", config.probes.join(", "))),
        Some(ToolSelection::Promptmap) => lines.push(field("Directory", config.promptmap_directory.clone())),
        None => {}
    }

    let status = match controller.relay_state() {
        _ if controller.is_scanning() => Line::from(vec![
            Span::styled(format!("{} ", SPINNER_CHARS[app.spinner_frame]), Style::default().fg(Color::Cyan)),
            Span::raw("Scanning in progress..."),
        ]),
        Some(RelayState::Idle) => Line::from(vec![
            Span::styled(format!("{} ", SPINNER_CHARS[app.spinner_frame]), Style::default().fg(Color::Cyan)),
            Span::raw("Connecting..."),
        ]),
        Some(RelayState::Error) => Line::from("✗ Output channel failed".red()),
        _ => Line::from("✓ Scan completed".green()),
    };
    let started = Line::from(format!(
        "Session {} · started {}",
        controller.relay_session_id().unwrap_or(&session.session_id),
        session.started_at.format("%H:%M:%S UTC")
    ))
    .dark_gray();

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(inner);
    frame.render_widget(Paragraph::new(lines), columns[0]);
    frame.render_widget(Paragraph::new(vec![status, Line::from(""), started]), columns[1]);
}
