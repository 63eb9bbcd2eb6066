// src/ui/widgets/progress.rs

use crate::app::App;
use crate::core::models::WizardStep;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use strum::IntoEnumIterator;

/// Renders the title bar with the four step markers; every step up to and
/// including the current one is highlighted.
pub fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.controller.step();

    let mut spans = Vec::new();
    for (i, step) in WizardStep::iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ── ", Style::default().fg(Color::DarkGray)));
        }
        let style = if step == current {
            Style::new().bold().fg(Color::Black).bg(Color::Cyan)
        } else if step < current {
            Style::new().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} {} ", step.number(), step), style));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" LLM Vulnerability Scanner ".bold());
    let progress = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(block);
    frame.render_widget(progress, area);
}
