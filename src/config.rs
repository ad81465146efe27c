use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::input::GestureConfig;

/// Tunables for the editor. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Shuffle the carousel after each fetch
    pub shuffle_on_load: bool,
    /// Artificial delay before the fetch runs, to exercise the loading state
    pub simulated_latency_ms: u64,
    /// On-canvas width of a photo at scale 1
    pub base_photo_width: f32,
    pub max_carousel_height: f32,
    pub carousel_height_fraction: f32,
    pub gestures: GestureConfig,
    /// Directory scanned for photos. Built-in assets are used when unset.
    pub assets_dir: Option<PathBuf>,
    /// When set, canvas photos are saved as JSON in this directory instead of app storage
    pub state_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            shuffle_on_load: true,
            simulated_latency_ms: 1000,
            base_photo_width: 200.0,
            max_carousel_height: 120.0,
            carousel_height_fraction: 0.3,
            gestures: GestureConfig::default(),
            assets_dir: None,
            state_dir: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load `path` if it exists, otherwise fall back to defaults. Unreadable or
    /// invalid files are logged and also fall back.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_json_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Carousel height for the given available height
    pub fn carousel_height(&self, available: f32) -> f32 {
        self.max_carousel_height.min(available * self.carousel_height_fraction)
    }

    /// On-canvas size of an unscaled photo
    pub fn base_photo_size(&self) -> egui::Vec2 {
        egui::vec2(self.base_photo_width, self.base_photo_width)
    }
}
