//! Layered configuration for soql-bridge.

mod loader;
pub mod settings;
pub mod user;

pub use loader::{
    LayerOrigin, SETTINGS_ENV_VAR, SettingsEvent, SettingsLoadOutcome, SettingsOverride,
    load_settings,
};
pub use settings::{BridgeSettings, SettingsLayer};
