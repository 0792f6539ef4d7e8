//! Configuration system

pub use serde::{Serialize, Deserialize};

use crate::foundation::math::Color;
use crate::render::polyline::{DEFAULT_OUTLINE_WIDTH, DEFAULT_WIDTH};
use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// What happens to a primitive when its entity leaves the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Remove the primitive from the registry immediately
    #[default]
    Release,
    /// Hide the primitive and keep it pooled for the id's return
    Hide,
}

/// Styling applied to a freshly created primitive before any sampled field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolylineDefaults {
    /// Line color
    pub color: Color,
    /// Line width in pixels
    pub width: f32,
    /// Outline color
    pub outline_color: Color,
    /// Outline width in pixels
    pub outline_width: f32,
}

impl Default for PolylineDefaults {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            width: DEFAULT_WIDTH,
            outline_color: Color::WHITE,
            outline_width: DEFAULT_OUTLINE_WIDTH,
        }
    }
}

/// Visualizer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Handling of structural removal (single remove or clear)
    pub removal_policy: RemovalPolicy,
    /// Initial primitive styling
    pub defaults: PolylineDefaults,
}

impl Config for VisualizerConfig {}
