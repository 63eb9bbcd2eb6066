// src/ui/widgets/error_banner.rs

use crate::app::App;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// The single user-visible error slot. Only the latest error is ever shown.
pub fn render_error_banner(frame: &mut Frame, app: &App, area: Rect) {
    let Some(error) = app.controller.last_error() else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(" Error ({}) ", error.kind()));
    let banner = Paragraph::new(format!("✗ {error}"))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(banner, area);
}
