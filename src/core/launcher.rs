// src/core/launcher.rs

use chrono::Utc;
use tracing::info;

use crate::core::client::BackendClient;
use crate::core::error::ScanError;
use crate::core::models::{ScanConfiguration, ScanRequest, ScanSession, ToolSelection};

/// The launch gate. Turns a configuration into the request body, or rejects it
/// without touching anything.
///
/// Catalog membership of `environment`/`model` is not checked here: values
/// only ever come from rendered catalog entries.
pub fn build_request(config: &ScanConfiguration) -> Result<ScanRequest, ScanError> {
    let tool = match config.tool {
        Some(tool) if !config.environment.is_empty() && !config.model.is_empty() => tool,
        _ => {
            return Err(ScanError::Validation(
                "Please select environment, model, and tool".to_string(),
            ));
        }
    };

    let (probes, promptmap_directory) = match tool {
        ToolSelection::Garak => {
            if config.probes.is_empty() {
                return Err(ScanError::Validation(
                    "Please select at least one probe for Garak".to_string(),
                ));
            }
            (config.probes.clone(), None)
        }
        ToolSelection::Promptmap => {
            if config.promptmap_directory.trim().is_empty() {
                return Err(ScanError::Validation(
                    "Please enter the Promptmap directory path".to_string(),
                ));
            }
            (Vec::new(), Some(config.promptmap_directory.clone()))
        }
    };

    Ok(ScanRequest {
        environment: config.environment.clone(),
        model_name: config.model.clone(),
        tool: tool.to_string(),
        probes,
        promptmap_directory,
    })
}

/// Submits a request that already passed [`build_request`] and builds the
/// session from the reply. Exactly one remote call, never retried.
pub async fn submit(
    client: &BackendClient,
    configuration: ScanConfiguration,
    request: ScanRequest,
) -> Result<ScanSession, ScanError> {
    let created = client.create_scan(&request).await?;
    info!(session_id = %created.session_id, status = ?created.status, "Scan session created.");
    Ok(ScanSession {
        session_id: created.session_id,
        configuration,
        started_at: Utc::now(),
    })
}
