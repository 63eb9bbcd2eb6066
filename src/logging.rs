// src/logging.rs

use color_eyre::eyre::Result;
use directories::ProjectDirs;
use lazy_static::lazy_static;
use std::path::PathBuf;
use time::macros::format_description;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, fmt::time::LocalTime, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

lazy_static! {
    /// Prefix for every environment variable read here, e.g. `LLM_SCAN_WIZARD_LOGLEVEL`.
    pub static ref ENV_PREFIX: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref LOG_LEVEL_ENV: String = format!("{}_LOGLEVEL", *ENV_PREFIX);
    pub static ref DATA_DIR_ENV: String = format!("{}_DATA", *ENV_PREFIX);
}

/// Where the session log goes: `$LLM_SCAN_WIZARD_DATA` if set, otherwise the
/// platform's local data directory, otherwise `./.data`.
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV.as_str()) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("com", "llm-scan-wizard", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(".data"))
}

pub fn log_file_path() -> PathBuf {
    get_data_dir().join(concat!(env!("CARGO_PKG_NAME"), ".log"))
}

/// `RUST_LOG` wins over the crate-specific variable; with neither set only
/// this crate logs, at `info`.
fn file_filter(rust_log: Option<String>, crate_level: Option<String>) -> String {
    rust_log
        .or(crate_level)
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| format!("{}=info", env!("CARGO_CRATE_NAME")))
}

/// Initializes file-based logging. The terminal belongs to the TUI, so
/// nothing is ever written to stdout or stderr.
pub fn initialize_logging() -> Result<()> {
    std::fs::create_dir_all(get_data_dir())?;
    let log_file = std::fs::File::create(log_file_path())?;

    let filter = file_filter(
        std::env::var("RUST_LOG").ok(),
        std::env::var(LOG_LEVEL_ENV.as_str()).ok(),
    );

    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_timer(timer)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_names_derive_from_crate() {
        assert_eq!(LOG_LEVEL_ENV.as_str(), "LLM_SCAN_WIZARD_LOGLEVEL");
        assert_eq!(DATA_DIR_ENV.as_str(), "LLM_SCAN_WIZARD_DATA");
        assert!(log_file_path().ends_with("llm-scan-wizard.log"));
    }

    #[test]
    fn rust_log_takes_precedence() {
        assert_eq!(file_filter(Some("debug".into()), Some("warn".into())), "debug");
        assert_eq!(file_filter(None, Some("warn".into())), "warn");
    }

    #[test]
    fn blank_or_missing_filter_falls_back_to_crate_info() {
        assert_eq!(file_filter(None, None), "llm_scan_wizard=info");
        assert_eq!(file_filter(Some("  ".into()), None), "llm_scan_wizard=info");
    }
}
