//! Merge rules: defaults applied beneath every other source.

use crate::config::{DEFAULT_CORE_ADDRESS, DEFAULT_REQUEST_TIMEOUT_SECS};
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("core.address", DEFAULT_CORE_ADDRESS)?
        .set_default("core.request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)
}
