// src/config.rs

use std::time::Duration;

use clap::Parser;

/// Command-line and environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "llm-scan-wizard", version, about = "Configure, launch and follow an LLM vulnerability scan")]
pub struct Config {
    /// Base address of the scan backend; API calls go to `<url>/api/...`.
    #[arg(long, env = "SCAN_BACKEND_URL", default_value = "http://localhost:8005")]
    pub backend_url: String,

    /// Base address of the streaming endpoint. Defaults to the backend
    /// address with `http` replaced by `ws` (or `https` by `wss`).
    #[arg(long, env = "SCAN_STREAM_URL")]
    pub stream_url: Option<String>,

    /// Timeout for catalog and session-creation requests, in seconds.
    #[arg(long, env = "SCAN_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
