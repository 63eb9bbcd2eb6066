// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions for one frame.
pub struct AppLayout {
    pub header: Rect,
    pub error: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Splits the frame vertically: progress header, an error banner that only
/// takes space when there is an error, the step body and a one-line footer.
pub fn create_layout(frame_size: Rect, show_error: bool) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(if show_error { 3 } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame_size);

    AppLayout {
        header: chunks[0],
        error: chunks[1],
        body: chunks[2],
        footer: chunks[3],
    }
}

/// Splits `area` into a fixed-height top part and the remainder.
pub fn split_top(area: Rect, top_height: u16) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(top_height), Constraint::Min(0)])
        .split(area);
    (chunks[0], chunks[1])
}
