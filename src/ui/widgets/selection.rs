// src/ui/widgets/selection.rs

use crate::app::{App, SPINNER_CHARS};
use crate::core::models::WizardStep;
use crate::ui::layout::split_top;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// Renders the model or environment step: a heading and a single-choice list
/// built from the catalog.
pub fn render_catalog_step(frame: &mut Frame, app: &mut App, area: Rect) {
    let (title, description, icon) = match app.controller.step() {
        WizardStep::SelectEnvironment => (
            "Select Environment",
            "Choose the conda environment where the tools are installed",
            "🐍",
        ),
        _ => ("Select LLM Model", "Choose the model to test for vulnerabilities", "🧠"),
    };

    let (heading_area, list_area) = split_top(area, 2);
    frame.render_widget(
        Paragraph::new(vec![Line::from(title.bold()), Line::from(description.dark_gray())]),
        heading_area,
    );

    let loading = app.controller.is_loading();
    let spinner = SPINNER_CHARS[app.spinner_frame];
    let config = app.controller.config();
    let catalog = app.controller.catalog();
    let (options, chosen, state) = match app.controller.step() {
        WizardStep::SelectEnvironment => (&catalog.environments, config.environment.as_str(), &mut app.environment_list_state),
        _ => (&catalog.models, config.model.as_str(), &mut app.model_list_state),
    };

    let block = Block::default().borders(Borders::ALL).title(title);
    if options.is_empty() {
        let text = if loading {
            format!("{spinner} Loading...")
        } else {
            "Nothing to choose from. Press R to reload.".to_string()
        };
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center).block(block), list_area);
        return;
    }

    render_single_choice(frame, block, options, chosen, icon, state, list_area);
}

/// A list where at most one entry is the current choice, marked with `icon`.
pub fn render_single_choice(
    frame: &mut Frame,
    block: Block,
    options: &[String],
    chosen: &str,
    icon: &str,
    state: &mut ListState,
    area: Rect,
) {
    let items: Vec<ListItem> = options
        .iter()
        .map(|option| {
            if option == chosen {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{icon} ")),
                    Span::styled(option.as_str(), Style::new().bold().fg(Color::Green)),
                    Span::styled("  (selected)", Style::new().fg(Color::Green)),
                ]))
            } else {
                ListItem::new(Line::from(vec![Span::raw("   "), Span::raw(option.as_str())]))
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");
    frame.render_stateful_widget(list, area, state);
}
