//! Configuration System
//!
//! Settings for the CLI process itself: where the core process listens and how
//! logging behaves. Layered with the `config` crate, lowest to highest precedence:
//! defaults, the global config file, an explicit `--config` file, then `CLINO__*`
//! environment variables.
//!
//! Provider and model state is not stored here; it belongs to the config service.

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::global_file::global_config_path;

pub const DEFAULT_CORE_ADDRESS: &str = "http://127.0.0.1:26040";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub core: CoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection to the core process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Base URL of the core process, e.g. `http://127.0.0.1:26040`
    #[serde(default = "default_address")]
    pub address: String,

    /// Per-request timeout. Streaming subscriptions are exempt.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_address() -> String {
    DEFAULT_CORE_ADDRESS.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.address.starts_with("http://") || self.address.starts_with("https://")) {
            return Err(format!(
                "core.address must start with http:// or https:// (got '{}')",
                self.address
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err("core.request_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.core.validate().map_err(ConfigError::Invalid)
    }
}

/// Loads [`AppConfig`] from all sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load using the global config location for this user.
    pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
        Self::load_from(global_config_path(), explicit)
    }

    /// Load with an explicit global file location (`None` skips the global file).
    pub fn load_from(
        global_file: Option<PathBuf>,
        explicit: Option<&Path>,
    ) -> Result<AppConfig, ConfigError> {
        let mut builder = merge::merge_policy::builder_with_defaults()?;
        if let Some(path) = global_file {
            builder = sources::global_file::add_to_builder(builder, &path);
        }
        if let Some(path) = explicit {
            builder = sources::explicit_file::add_to_builder(builder, path)?;
        }
        builder = sources::environment::add_to_builder(builder);

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
