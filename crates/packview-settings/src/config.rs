//! Configuration and settings management for PackView
//!
//! Supports JSON and TOML file formats, chosen by file extension, stored
//! in the platform config directory by default.
//!
//! Configuration is organized into logical sections:
//! - Scene (container and packed boxes)
//! - View (output size, camera, orbit controls)
//! - Labels (font selection)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use packview_core::{Color, SceneConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Perspective camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Initial eye position, render space
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 100.0,
            position: [8.0, 4.0, -8.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Orbit control settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    pub auto_rotate: bool,
    /// Full turns per minute
    pub auto_rotate_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            enable_damping: false,
            damping_factor: 0.05,
        }
    }
}

/// Output and camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub background: Color,
    pub camera: CameraSettings,
    pub controls: ControlsSettings,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            pixel_ratio: 1.0,
            background: Color::WHITE,
            camera: CameraSettings::default(),
            controls: ControlsSettings::default(),
        }
    }
}

/// Face label settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    pub enabled: bool,
    /// System font family, resolved with a sans-serif fallback
    pub font_family: String,
    /// Font file; takes precedence over `font_family`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            font_family: "Helvetica".to_string(),
            font_path: None,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub labels: LabelSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/packview/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
        })?;
        Ok(dir.join("packview").join("config.toml"))
    }

    /// Parse and validate TOML config text
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), boxes = config.scene.boxes.len(), "config loaded");
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content)?;
        debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Validate configuration.
    ///
    /// Box dimensions are checked per box when the scene is laid out, so
    /// one bad box never rejects the whole file.
    pub fn validate(&self) -> SettingsResult<()> {
        let view = &self.view;
        if view.width == 0 || view.height == 0 {
            return Err(SettingsError::invalid("view", "width and height must be > 0"));
        }
        if !(view.pixel_ratio > 0.0) {
            return Err(SettingsError::invalid("view.pixel_ratio", "must be > 0"));
        }

        let camera = &view.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(SettingsError::invalid(
                "view.camera.fov",
                "must be between 0 and 180 degrees",
            ));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(SettingsError::invalid(
                "view.camera.near",
                "must satisfy 0 < near < far",
            ));
        }
        if camera.position == camera.target {
            return Err(SettingsError::invalid(
                "view.camera.position",
                "must differ from the target",
            ));
        }

        let controls = &view.controls;
        if !(controls.damping_factor > 0.0 && controls.damping_factor <= 1.0) {
            return Err(SettingsError::invalid(
                "view.controls.damping_factor",
                "must be in (0, 1]",
            ));
        }
        if !controls.auto_rotate_speed.is_finite() {
            return Err(SettingsError::invalid(
                "view.controls.auto_rotate_speed",
                "must be finite",
            ));
        }

        if self.scene.container_segments == 0 {
            return Err(SettingsError::invalid(
                "scene.container_segments",
                "must be > 0",
            ));
        }
        if let Some(i) = self.scene.boxes.iter().position(|b| b.name.trim().is_empty()) {
            return Err(SettingsError::invalid(
                format!("scene.boxes[{}].name", i),
                "must not be empty",
            ));
        }

        if self.labels.enabled
            && self.labels.font_path.is_none()
            && self.labels.font_family.trim().is_empty()
        {
            return Err(SettingsError::invalid(
                "labels.font_family",
                "must name a family when no font_path is set",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packview_core::BoxSpec;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.view.width, 1280);
        assert_eq!(config.view.height, 720);
        assert_eq!(config.view.camera.fov, 75.0);
        assert_eq!(config.view.camera.position, [8.0, 4.0, -8.0]);
        assert_eq!(config.view.controls.damping_factor, 0.05);
        assert_eq!(config.scene.boxes.len(), 6);
        assert!(config.labels.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_view() {
        let mut config = Config::new();
        config.view.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.view.camera.fov = 180.0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.view.camera.near = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unnamed_box() {
        let mut config = Config::new();
        config.scene.boxes.push(BoxSpec::new("  ", 1.0, 1.0, 1.0));
        match config.validate() {
            Err(SettingsError::InvalidSetting { key, .. }) => {
                assert_eq!(key, "scene.boxes[6].name");
            }
            other => panic!("expected invalid setting, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_bad_box_dimensions() {
        let mut config = Config::new();
        config.scene.boxes.push(BoxSpec::new("Flat", 1.0, 0.0, 1.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml_str(
            r##"
            [view]
            width = 640

            [[scene.boxes]]
            name = "Only"
            length = 1.0
            width = 2.0
            height = 3.0
            color = "#ff0000"
            "##,
        )
        .unwrap();
        assert_eq!(config.view.width, 640);
        assert_eq!(config.view.height, 720);
        assert_eq!(config.scene.boxes.len(), 1);
        assert_eq!(config.scene.boxes[0].color, Color::RED);
        assert!(config.scene.container.is_none());
        assert_eq!(config.scene.container_segments, 4);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Config::new()
            .save_to_file(Path::new("config.yaml"))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::UnsupportedFormat(_))
        ));
    }
}
