// src/ui/widgets/input.rs

use ratatui::{prelude::*, widgets::{Block, Borders, Paragraph}};
use crate::app::App;

/// Renders the promptmap directory field. The cursor is shown only while the
/// field has focus.
pub fn render_directory_input(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.is_editing_directory();
    let directory = app.controller.config().promptmap_directory.as_str();

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title("Promptmap Directory");
    let input_paragraph = Paragraph::new(directory)
        .block(input_block)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(input_paragraph, area);

    if focused {
        let width = directory.chars().count() as u16;
        frame.set_cursor_position((
            (area.x + width + 1).min(area.right().saturating_sub(2)),
            area.y + 1,
        ));
    }
}
