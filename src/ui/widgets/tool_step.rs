// src/ui/widgets/tool_step.rs

use crate::app::{App, ToolFocus};
use crate::core::models::ToolSelection;
use crate::ui::layout::split_top;
use crate::ui::widgets::{input, selection};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

/// Renders the tool step: tool choice on top, then either the probe checklist
/// (garak) or the directory field (promptmap).
pub fn render_tool_step(frame: &mut Frame, app: &mut App, area: Rect) {
    let (heading_area, rest) = split_top(area, 2);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from("Select Tool".bold()),
            Line::from("Choose the vulnerability testing tool".dark_gray()),
        ]),
        heading_area,
    );

    let (tools_area, options_area) = split_top(rest, 4);
    let tools: Vec<String> = App::tools().iter().map(|t| t.label().to_string()).collect();
    let chosen = app.controller.config().tool.map(|t| t.label()).unwrap_or_default();
    let tool_block = panel_block("Tool".to_string(), app.tool_focus == ToolFocus::Tools);
    selection::render_single_choice(frame, tool_block, &tools, chosen, "🛠", &mut app.tool_list_state, tools_area);

    match app.controller.config().tool {
        Some(ToolSelection::Garak) => render_probe_checklist(frame, app, options_area),
        Some(ToolSelection::Promptmap) => {
            let (input_area, _) = split_top(options_area, 3);
            input::render_directory_input(frame, app, input_area);
        }
        None => {
            let hint = Paragraph::new("Pick a tool to continue.").alignment(Alignment::Center);
            frame.render_widget(hint, options_area);
        }
    }
}

fn render_probe_checklist(frame: &mut Frame, app: &mut App, area: Rect) {
    let config = app.controller.config();
    let probes = &app.controller.catalog().probes;

    let title = format!("Probes  (Selected: {} / {})", config.probes.len(), probes.len());
    let block = panel_block(title, app.tool_focus == ToolFocus::Options);

    let items: Vec<ListItem> = probes
        .iter()
        .map(|probe| {
            if config.has_probe(probe) {
                ListItem::new(Line::from(vec![
                    Span::styled("[x] ", Style::new().fg(Color::Green)),
                    Span::styled(probe.as_str(), Style::new().fg(Color::Green)),
                ]))
            } else {
                ListItem::new(Line::from(vec![Span::raw("[ ] "), Span::raw(probe.as_str())]))
            }
        })
        .collect();

    let mut list = List::new(items).block(block);
    if app.tool_focus == ToolFocus::Options {
        list = list
            .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("› ");
    }
    frame.render_stateful_widget(list, area, &mut app.probe_list_state);
}
