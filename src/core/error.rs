// src/core/error.rs

use thiserror::Error;

/// Every failure the session controller can surface to the operator.
///
/// All variants are recoverable: the controller stores the latest one in its
/// error slot and the operator can always reset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// One of the three catalog fetches failed. No partial catalog is kept.
    #[error("Failed to load initial data: {0}")]
    CatalogLoad(String),

    /// The configuration did not pass the launch gate. Nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected the session or could not be reached.
    #[error("Failed to start scan: {0}")]
    Launch(String),

    /// The live output channel failed after it was requested.
    #[error("WebSocket error: {0}")]
    Channel(String),
}

impl ScanError {
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::CatalogLoad(_) => "catalog",
            ScanError::Validation(_) => "validation",
            ScanError::Launch(_) => "launch",
            ScanError::Channel(_) => "channel",
        }
    }
}

/// Failures while building the backend client from configuration.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid address `{0}`: {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("address `{0}` has no streaming counterpart (expected http, https, ws or wss)")]
    UnsupportedScheme(String),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
