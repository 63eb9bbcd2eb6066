// src/app.rs

use crate::core::controller::SessionController;
use crate::core::models::{ToolSelection, WizardStep};
use ratatui::widgets::ListState;
use strum::IntoEnumIterator;

pub const SPINNER_CHARS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which half of the tool step receives the arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolFocus {
    Tools,
    /// The probe list for garak, the directory input for promptmap.
    Options,
}

/// UI-side state wrapped around the session controller: cursors, scroll
/// position and the spinner. Nothing here affects what gets launched.
pub struct App {
    pub should_quit: bool,
    pub controller: SessionController,
    pub model_list_state: ListState,
    pub environment_list_state: ListState,
    pub tool_list_state: ListState,
    pub probe_list_state: ListState,
    pub tool_focus: ToolFocus,
    pub spinner_frame: usize,
    pub output_scroll: usize,
    pub follow_output: bool,
}

impl App {
    pub fn new(controller: SessionController) -> Self {
        Self {
            should_quit: false,
            controller,
            model_list_state: ListState::default().with_selected(Some(0)),
            environment_list_state: ListState::default().with_selected(Some(0)),
            tool_list_state: ListState::default().with_selected(Some(0)),
            probe_list_state: ListState::default().with_selected(Some(0)),
            tool_focus: ToolFocus::Tools,
            spinner_frame: 0,
            output_scroll: 0,
            follow_output: true,
        }
    }

    pub fn tools() -> Vec<ToolSelection> {
        ToolSelection::iter().collect()
    }

    /// Typing goes to the promptmap directory instead of being treated as a command.
    pub fn is_editing_directory(&self) -> bool {
        self.controller.step() == WizardStep::SelectTool
            && self.tool_focus == ToolFocus::Options
            && self.controller.config().tool == Some(ToolSelection::Promptmap)
    }

    pub fn on_tick(&mut self) {
        if self.controller.is_scanning() || self.controller.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // --- Cursor movement ---

    pub fn cursor_up(&mut self) {
        self.move_cursor(-1);
    }

    pub fn cursor_down(&mut self) {
        self.move_cursor(1);
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.controller.step() == WizardStep::Running {
            if delta < 0 {
                self.scroll_output_up();
            } else {
                self.scroll_output_down();
            }
            return;
        }

        let catalog = self.controller.catalog();
        let (state, len) = match (self.controller.step(), self.tool_focus) {
            (WizardStep::SelectModel, _) => (&mut self.model_list_state, catalog.models.len()),
            (WizardStep::SelectEnvironment, _) => (&mut self.environment_list_state, catalog.environments.len()),
            (WizardStep::SelectTool, ToolFocus::Tools) | (WizardStep::Running, _) => {
                (&mut self.tool_list_state, ToolSelection::iter().count())
            }
            (WizardStep::SelectTool, ToolFocus::Options) => (&mut self.probe_list_state, catalog.probes.len()),
        };
        if len == 0 {
            state.select(None);
            return;
        }
        let current = state.selected().unwrap_or(0).min(len - 1);
        let next = (current as isize + delta).rem_euclid(len as isize) as usize;
        state.select(Some(next));
    }

    /// Applies the entry under the cursor: picks the model, environment or
    /// tool, or toggles the probe.
    pub fn select_current(&mut self) {
        match self.controller.step() {
            WizardStep::SelectModel => {
                let picked = self
                    .model_list_state
                    .selected()
                    .and_then(|i| self.controller.catalog().models.get(i).cloned());
                if let Some(model) = picked {
                    self.controller.select_model(&model);
                }
            }
            WizardStep::SelectEnvironment => {
                let picked = self
                    .environment_list_state
                    .selected()
                    .and_then(|i| self.controller.catalog().environments.get(i).cloned());
                if let Some(environment) = picked {
                    self.controller.select_environment(&environment);
                }
            }
            WizardStep::SelectTool => match self.tool_focus {
                ToolFocus::Tools => {
                    let picked = self.tool_list_state.selected().and_then(|i| Self::tools().get(i).copied());
                    if let Some(tool) = picked {
                        self.controller.select_tool(tool);
                        self.tool_focus = ToolFocus::Options;
                    }
                }
                ToolFocus::Options => {
                    let picked = self
                        .probe_list_state
                        .selected()
                        .and_then(|i| self.controller.catalog().probes.get(i).cloned());
                    if let Some(probe) = picked {
                        self.controller.toggle_probe(&probe);
                    }
                }
            },
            WizardStep::Running => {}
        }
    }

    pub fn toggle_tool_focus(&mut self) {
        if self.controller.step() != WizardStep::SelectTool || self.controller.config().tool.is_none() {
            return;
        }
        self.tool_focus = match self.tool_focus {
            ToolFocus::Tools => ToolFocus::Options,
            ToolFocus::Options => ToolFocus::Tools,
        };
    }

    // --- Directory input ---

    pub fn push_directory_char(&mut self, c: char) {
        let mut directory = self.controller.config().promptmap_directory.clone();
        directory.push(c);
        self.controller.set_promptmap_directory(&directory);
    }

    pub fn pop_directory_char(&mut self) {
        let mut directory = self.controller.config().promptmap_directory.clone();
        if directory.pop().is_some() {
            self.controller.set_promptmap_directory(&directory);
        }
    }

    // --- Wizard actions ---

    pub fn next_step(&mut self) {
        if self.controller.step() == WizardStep::SelectTool {
            self.start_scan();
        } else if self.controller.advance() {
            self.tool_focus = ToolFocus::Tools;
        }
    }

    pub fn previous_step(&mut self) {
        if self.controller.retreat() {
            self.tool_focus = ToolFocus::Tools;
        }
    }

    pub fn start_scan(&mut self) {
        // Validation errors are already in the controller's error slot.
        if let Ok(true) = self.controller.launch() {
            self.follow_output = true;
            self.output_scroll = 0;
        }
    }

    pub fn new_scan(&mut self) {
        self.controller.reset();
        self.tool_focus = ToolFocus::Tools;
        self.output_scroll = 0;
        self.follow_output = true;
        self.spinner_frame = 0;
    }

    pub fn reload_catalog(&mut self) {
        self.controller.load_catalog();
    }

    // --- Output scrolling ---

    pub fn scroll_output_up(&mut self) {
        self.follow_output = false;
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    pub fn scroll_output_down(&mut self) {
        self.follow_output = false;
        let max = self.controller.output().len().saturating_sub(1);
        self.output_scroll = self.output_scroll.saturating_add(1).min(max);
    }

    pub fn follow_output_tail(&mut self) {
        self.follow_output = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::BackendClient;
    use crate::core::controller::SessionEvent;
    use crate::core::models::OptionCatalog;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn app_with_catalog() -> (App, mpsc::UnboundedReceiver<SessionEvent>) {
        let client = BackendClient::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut controller = SessionController::new(client, tx);
        controller.handle_event(SessionEvent::CatalogLoaded(Ok(OptionCatalog {
            environments: vec!["dev".into(), "prod".into()],
            models: vec!["llama3:8b".into(), "gpt-4".into()],
            probes: vec!["p1".into(), "p2".into()],
        })));
        (App::new(controller), rx)
    }

    #[test]
    fn cursor_wraps_and_selects_model() {
        let (mut app, _rx) = app_with_catalog();
        app.cursor_up();
        app.select_current();
        assert_eq!(app.controller.config().model, "gpt-4");
        app.cursor_down();
        app.select_current();
        assert_eq!(app.controller.config().model, "llama3:8b");
    }

    #[test]
    fn next_step_is_gated_by_selection() {
        let (mut app, _rx) = app_with_catalog();
        app.next_step();
        assert_eq!(app.controller.step(), WizardStep::SelectModel);
        app.select_current();
        app.next_step();
        assert_eq!(app.controller.step(), WizardStep::SelectEnvironment);
    }

    #[test]
    fn typing_edits_directory_only_in_promptmap_options() {
        let (mut app, _rx) = app_with_catalog();
        app.select_current();
        app.next_step();
        app.select_current();
        app.next_step();
        assert_eq!(app.controller.step(), WizardStep::SelectTool);
        assert!(!app.is_editing_directory());

        app.cursor_down();
        app.select_current();
        assert_eq!(app.controller.config().tool, Some(ToolSelection::Promptmap));
        assert!(app.is_editing_directory());

        for c in "/tmpx".chars() {
            app.push_directory_char(c);
        }
        app.pop_directory_char();
        assert_eq!(app.controller.config().promptmap_directory, "/tmp");
    }

    #[test]
    fn probe_toggle_uses_cursor() {
        let (mut app, _rx) = app_with_catalog();
        app.select_current();
        app.next_step();
        app.select_current();
        app.next_step();
        app.select_current();
        assert_eq!(app.tool_focus, ToolFocus::Options);
        app.cursor_down();
        app.select_current();
        assert_eq!(app.controller.config().probes, vec!["p2".to_string()]);
    }
}
