// src/ui/widgets/output_view.rs

use crate::app::App;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};

/// Renders the raw scan output, one buffer entry per row.
///
/// While following, the view is pinned to the tail and `app.output_scroll` is
/// kept in sync so a manual scroll starts from what is on screen. Scrolling
/// back down to the tail resumes following.
pub fn render_output_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let output = app.controller.output();
    let lines = output.lines();
    let title = if app.follow_output {
        format!("Output ({} lines)", lines.len())
    } else {
        format!("Output ({} lines, paused, End to follow)", lines.len())
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if output.is_empty() {
        let waiting = Paragraph::new("Waiting for output...".dark_gray()).alignment(Alignment::Center);
        frame.render_widget(waiting, inner_area);
        return;
    }

    let visible = inner_area.height as usize;
    let tail_offset = lines.len().saturating_sub(visible);
    if app.follow_output || app.output_scroll >= tail_offset {
        app.follow_output = true;
        app.output_scroll = tail_offset;
    }
    let offset = app.output_scroll;

    let rows: Vec<Line> = lines
        .iter()
        .skip(offset)
        .take(visible)
        .map(|line| Line::from(line.as_str()))
        .collect();
    frame.render_widget(Paragraph::new(rows), inner_area);

    if lines.len() > visible {
        let mut scroll_state = ScrollbarState::new(tail_offset).position(offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin { vertical: 1, horizontal: 0 }),
            &mut scroll_state,
        );
    }
}
