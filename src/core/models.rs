// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

// --- Catalog ---

/// The three option lists offered by the backend.
///
/// Fetched once at startup and replaced wholesale on an explicit reload;
/// never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionCatalog {
    pub environments: Vec<String>,
    pub models: Vec<String>,
    pub probes: Vec<String>,
}

// Response envelopes for the three catalog endpoints.

#[derive(Debug, Deserialize)]
pub struct EnvironmentsResponse {
    pub environments: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProbesResponse {
    pub probes: Vec<String>,
}

// --- Configuration ---

/// The external scanning tool that runs the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToolSelection {
    Garak,
    Promptmap,
}

impl ToolSelection {
    /// Human-facing name, as shown on the selection cards.
    pub fn label(&self) -> &'static str {
        match self {
            ToolSelection::Garak => "Garak",
            ToolSelection::Promptmap => "Promptmap",
        }
    }
}

/// Everything the operator has chosen so far.
///
/// Empty strings and `None` mean "not selected yet". `probes` keeps the order
/// in which the operator ticked them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanConfiguration {
    pub environment: String,
    pub model: String,
    pub tool: Option<ToolSelection>,
    pub probes: Vec<String>,
    pub promptmap_directory: String,
}

impl ScanConfiguration {
    pub fn has_probe(&self, probe: &str) -> bool {
        self.probes.iter().any(|p| p == probe)
    }
}

// --- Wizard ---

/// The four ordered steps of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, EnumIter)]
#[repr(u8)]
pub enum WizardStep {
    #[default]
    #[strum(to_string = "Select Model")]
    SelectModel = 1,
    #[strum(to_string = "Select Environment")]
    SelectEnvironment = 2,
    #[strum(to_string = "Select Tool")]
    SelectTool = 3,
    #[strum(to_string = "Running Scan")]
    Running = 4,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectModel => Some(WizardStep::SelectEnvironment),
            WizardStep::SelectEnvironment => Some(WizardStep::SelectTool),
            WizardStep::SelectTool => Some(WizardStep::Running),
            WizardStep::Running => None,
        }
    }

    pub fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectModel => None,
            WizardStep::SelectEnvironment => Some(WizardStep::SelectModel),
            WizardStep::SelectTool => Some(WizardStep::SelectEnvironment),
            WizardStep::Running => Some(WizardStep::SelectTool),
        }
    }
}

// --- Wire Types ---

/// Body of `POST /api/scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    pub environment: String,
    pub model_name: String,
    pub tool: String,
    pub probes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promptmap_directory: Option<String>,
}

/// Response of `POST /api/scan`. Extra fields sent by the backend are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScanCreated {
    pub session_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

// --- Session ---

/// One launched scan, owned by the session controller until reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSession {
    pub session_id: String,
    pub configuration: ScanConfiguration,
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn tool_names_are_lowercase_on_the_wire() {
        assert_eq!(ToolSelection::Garak.to_string(), "garak");
        assert_eq!(ToolSelection::from_str("promptmap").unwrap(), ToolSelection::Promptmap);
        assert_eq!(serde_json::to_value(ToolSelection::Promptmap).unwrap(), json!("promptmap"));
    }

    #[test]
    fn steps_are_ordered_and_linear() {
        assert_eq!(WizardStep::default(), WizardStep::SelectModel);
        assert_eq!(WizardStep::SelectModel.number(), 1);
        assert_eq!(WizardStep::Running.number(), 4);
        assert!(WizardStep::SelectTool < WizardStep::Running);
        assert_eq!(WizardStep::SelectModel.previous(), None);
        assert_eq!(WizardStep::Running.next(), None);
        assert_eq!(WizardStep::SelectEnvironment.next(), Some(WizardStep::SelectTool));
    }

    #[test]
    fn request_omits_directory_when_absent() {
        let request = ScanRequest {
            environment: "prod".into(),
            model_name: "gpt-4".into(),
            tool: "garak".into(),
            probes: vec!["p1".into()],
            promptmap_directory: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"environment": "prod", "model_name": "gpt-4", "tool": "garak", "probes": ["p1"]})
        );
    }

    #[test]
    fn scan_created_tolerates_extra_fields() {
        let created: ScanCreated =
            serde_json::from_value(json!({"session_id": "abc", "status": "created", "extra": 1})).unwrap();
        assert_eq!(created.session_id, "abc");
        assert_eq!(created.status.as_deref(), Some("created"));
    }
}
