// src/core/wizard.rs

//! The configuration state machine.
//!
//! Pure data plus transition functions: no I/O, no clocks. Guards that depend
//! on the live channel or on an outstanding launch are applied by the session
//! controller.

use tracing::debug;

use crate::core::models::{ScanConfiguration, ToolSelection, WizardStep};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wizard {
    step: WizardStep,
    config: ScanConfiguration,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn config(&self) -> &ScanConfiguration {
        &self.config
    }

    /// Whether the forward gate of the current step is satisfied.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::SelectModel => !self.config.model.is_empty(),
            WizardStep::SelectEnvironment => !self.config.environment.is_empty(),
            // Leaving the tool step is the launch action, not a plain advance.
            WizardStep::SelectTool | WizardStep::Running => false,
        }
    }

    /// Moves one step forward. Returns `false` and leaves the step untouched
    /// when the gate is not satisfied.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            debug!(step = %self.step, "Advance rejected.");
            return false;
        }
        if let Some(next) = self.step.next() {
            debug!(from = %self.step, to = %next, "Advancing wizard.");
            self.step = next;
        }
        true
    }

    pub fn can_retreat(&self, channel_live: bool) -> bool {
        self.step != WizardStep::SelectModel && !channel_live
    }

    /// Moves one step back. Disallowed on the first step and while the live
    /// channel is streaming or still connecting.
    pub fn retreat(&mut self, channel_live: bool) -> bool {
        if !self.can_retreat(channel_live) {
            debug!(step = %self.step, channel_live, "Retreat rejected.");
            return false;
        }
        if let Some(previous) = self.step.previous() {
            debug!(from = %self.step, to = %previous, "Retreating wizard.");
            self.step = previous;
        }
        true
    }

    pub fn select_model(&mut self, name: impl Into<String>) {
        self.config.model = name.into();
    }

    pub fn select_environment(&mut self, name: impl Into<String>) {
        self.config.environment = name.into();
    }

    /// Switching tools keeps any probes already ticked; they are simply not
    /// submitted for promptmap.
    pub fn select_tool(&mut self, tool: ToolSelection) {
        self.config.tool = Some(tool);
    }

    /// Adds the probe if absent, removes it if present.
    pub fn toggle_probe(&mut self, probe: &str) {
        if let Some(index) = self.config.probes.iter().position(|p| p == probe) {
            self.config.probes.remove(index);
        } else {
            self.config.probes.push(probe.to_string());
        }
    }

    pub fn set_promptmap_directory(&mut self, directory: impl Into<String>) {
        self.config.promptmap_directory = directory.into();
    }

    /// Entered only by a successful launch.
    pub(crate) fn enter_running(&mut self) {
        debug!(from = %self.step, "Entering running step.");
        self.step = WizardStep::Running;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_from_first_step_requires_a_model() {
        let mut wizard = Wizard::new();
        assert!(!wizard.advance());
        assert_eq!(wizard.step(), WizardStep::SelectModel);

        wizard.select_model("gpt-4");
        assert!(wizard.advance());
        assert_eq!(wizard.step(), WizardStep::SelectEnvironment);
    }

    #[test]
    fn advance_from_environment_step_requires_an_environment() {
        let mut wizard = Wizard::new();
        wizard.select_model("gpt-4");
        wizard.advance();

        assert!(!wizard.advance());
        assert_eq!(wizard.step(), WizardStep::SelectEnvironment);

        wizard.select_environment("prod");
        assert!(wizard.advance());
        assert_eq!(wizard.step(), WizardStep::SelectTool);
    }

    #[test]
    fn tool_step_is_not_left_by_plain_advance() {
        let mut wizard = Wizard::new();
        wizard.select_model("gpt-4");
        wizard.select_environment("prod");
        wizard.advance();
        wizard.advance();
        wizard.select_tool(ToolSelection::Garak);
        wizard.toggle_probe("p1");

        assert!(!wizard.advance());
        assert_eq!(wizard.step(), WizardStep::SelectTool);
    }

    #[test]
    fn advance_from_running_is_a_no_op() {
        let mut wizard = Wizard::new();
        wizard.enter_running();
        assert!(!wizard.advance());
        assert_eq!(wizard.step(), WizardStep::Running);
    }

    #[test]
    fn retreat_is_blocked_on_first_step_and_while_scanning() {
        let mut wizard = Wizard::new();
        assert!(!wizard.retreat(false));

        wizard.select_model("gpt-4");
        wizard.advance();
        wizard.enter_running();
        let before = wizard.clone();
        assert!(!wizard.retreat(true));
        assert_eq!(wizard, before);

        assert!(wizard.retreat(false));
        assert_eq!(wizard.step(), WizardStep::SelectTool);
    }

    #[test]
    fn toggle_probe_is_a_symmetric_difference() {
        let mut wizard = Wizard::new();
        wizard.toggle_probe("p1");
        wizard.toggle_probe("p2");
        wizard.toggle_probe("p1");
        assert_eq!(wizard.config().probes, vec!["p2".to_string()]);
        wizard.toggle_probe("p2");
        assert!(wizard.config().probes.is_empty());
    }

    #[test]
    fn switching_tool_keeps_probes() {
        let mut wizard = Wizard::new();
        wizard.select_tool(ToolSelection::Garak);
        wizard.toggle_probe("p1");
        wizard.select_tool(ToolSelection::Promptmap);
        assert_eq!(wizard.config().tool, Some(ToolSelection::Promptmap));
        assert!(wizard.config().has_probe("p1"));
    }

    #[test]
    fn reset_restores_blank_state() {
        let mut wizard = Wizard::new();
        wizard.select_model("gpt-4");
        wizard.select_environment("prod");
        wizard.select_tool(ToolSelection::Promptmap);
        wizard.set_promptmap_directory("/data/prompts");
        wizard.enter_running();

        wizard.reset();
        assert_eq!(wizard, Wizard::new());
    }
}
