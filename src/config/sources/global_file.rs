//! Global config file source: $XDG_CONFIG_HOME/clino/config.toml or ~/.config/clino/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to the global config file for this user.
pub fn global_config_path() -> Option<PathBuf> {
    let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    global_config_path_from(std::env::var_os("XDG_CONFIG_HOME"), home)
}

/// Uses XDG_CONFIG_HOME when set and non-empty, otherwise `<home>/.config`.
pub fn global_config_path_from(
    xdg_config_home: Option<OsString>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    let config_root = match xdg_config_home {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => home?.join(".config"),
    };
    Some(config_root.join("clino").join("config.toml"))
}

/// Add the global config file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> ConfigBuilder<DefaultState> {
    if path.exists() {
        builder.add_source(File::from(path).required(false))
    } else {
        debug!(config_path = %path.display(), "No global configuration file found");
        builder
    }
}
