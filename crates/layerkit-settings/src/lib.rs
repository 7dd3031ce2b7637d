//! LayerKit Settings Crate
//!
//! Handles editor configuration: defaults, validation and JSON/TOML persistence.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, DrawingSettings, EditorSettings, HistorySettings, ShapeLimits,
    TransformSettings, ViewSettings,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
