//! PackView Settings Crate
//!
//! Handles the scene, view and label configuration and its persistence.

pub mod config;
pub mod error;

pub use config::{CameraSettings, Config, ControlsSettings, LabelSettings, ViewSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
