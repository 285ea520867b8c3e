//! User configuration loading for soql-bridge.
//!
//! User config location: $XDG_CONFIG_HOME/soql-bridge/soql-bridge.toml
//! Fallback: the platform config directory (`dirs::config_dir`).

use std::fs;
use std::path::PathBuf;

use super::settings::SettingsLayer;
use crate::error::{BridgeError, BridgeResult};

pub const CONFIG_DIR_NAME: &str = "soql-bridge";
pub const CONFIG_FILE_NAME: &str = "soql-bridge.toml";

/// Returns the path to the user configuration file, if a config directory
/// can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the user config. A missing file is `Ok(None)`.
pub fn load_user_config() -> BridgeResult<Option<SettingsLayer>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    toml::from_str::<SettingsLayer>(&contents)
        .map(Some)
        .map_err(|err| BridgeError::config(format!("{}: {}", path.display(), err)))
}
