//! Scene configuration loaded from JSON
//!
//! Every field has a default, so a config file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical pixels
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "scrollscape".to_string(),
            width: 1280,
            height: 800,
        }
    }
}

/// Image files, relative to `root`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    pub root: PathBuf,
    pub background: PathBuf,
    pub avatar: PathBuf,
    pub moon: PathBuf,
    pub moon_normal: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            background: PathBuf::from("space_image_01.jpg"),
            avatar: PathBuf::from("harsh_circle.png"),
            moon: PathBuf::from("moon_01.jpg"),
            moon_normal: PathBuf::from("normal.jpg"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: usize,
    /// Edge length of the cube the stars are scattered in, centered on the origin
    pub spread: f32,
    pub star_radius: f32,
    /// Fixed seed for a reproducible sky; entropy when absent
    pub seed: Option<u64>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 200,
            spread: 100.0,
            star_radius: 0.25,
            seed: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [-3.0, 0.0, 30.0],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

/// Virtual document that the scroll offset moves through
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub height_px: f32,
    /// Pixels per wheel line or arrow key press
    pub line_px: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            height_px: 6000.0,
            line_px: 60.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub starfield: StarfieldConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub page: PageConfig,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_json(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = SceneConfig::from_json("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.starfield.count, 200);
        assert_eq!(config.camera.position, [-3.0, 0.0, 30.0]);
        assert_eq!(config.assets.moon_normal, PathBuf::from("normal.jpg"));
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = SceneConfig::from_json(
            r#"{ "starfield": { "count": 50, "seed": 7 }, "window": { "title": "demo" } }"#,
        )
        .unwrap();
        assert_eq!(config.starfield.count, 50);
        assert_eq!(config.starfield.seed, Some(7));
        assert_eq!(config.starfield.spread, 100.0);
        assert_eq!(config.window.title, "demo");
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut config = SceneConfig::default();
        config.page.height_px = 3000.0;
        config.assets.root = PathBuf::from("assets");
        let restored = SceneConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = SceneConfig::from_json(r#"{ "starfield": { "count": "many" } }"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = Path::new("definitely/not/here.json");
        match SceneConfig::load(path) {
            Err(Error::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
