//! Configuration and credential resolution.

use std::fs;
use std::path::Path;

use crate::domain::{AppConfig, AppError};

/// Configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "vsp.toml";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Load configuration from `path`, or from `vsp.toml` in `dir` when present.
///
/// An explicit path must exist; the implicit file is optional.
pub fn load_config(path: Option<&Path>, dir: &Path) -> Result<AppConfig, AppError> {
    let config = match path {
        Some(path) => parse_config_file(path)?,
        None => {
            let implicit = dir.join(CONFIG_FILE_NAME);
            if implicit.is_file() { parse_config_file(&implicit)? } else { AppConfig::default() }
        }
    };
    config.validate()?;
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<AppConfig, AppError> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::config_error(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(toml::from_str(&content)?)
}

/// First non-blank API key found in the environment.
pub fn resolve_api_key() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
