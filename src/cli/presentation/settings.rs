//! `clino config show`

use crate::config::AppConfig;
use crate::error::{CliError, ConfigError};

pub fn format_settings(settings: &AppConfig) -> Result<String, CliError> {
    toml::to_string_pretty(settings)
        .map(|text| text.trim_end().to_string())
        .map_err(|e| ConfigError::Invalid(format!("Failed to render settings: {}", e)).into())
}
