//! # Unified Configuration System
//!
//! All configuration structures in one place: frame driver behavior, asset
//! locations, and the scene description used by
//! [`SceneBuilder`](crate::scene::SceneBuilder).
//!
//! Every type is serializable, so a whole [`ApplicationConfig`] can be read
//! from TOML or RON through the [`Config`] trait.

use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::scene::behavior::{DEFAULT_AXIS, DEFAULT_DEGREES_PER_SECOND};

pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Frame loop limits, pacing, and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log level when `RUST_LOG` is not set
    pub log_level: String,
    /// Target FPS for frame pacing; `None` runs frames back to back
    pub target_fps: Option<f32>,
    /// Stop after this many frames
    pub max_frames: Option<u64>,
    /// Stop once this many seconds have elapsed on the engine clock
    pub max_seconds: Option<f32>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            target_fps: Some(60.0),
            max_frames: None,
            max_seconds: None,
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set target FPS (`None` disables pacing)
    #[must_use]
    pub fn with_target_fps(mut self, fps: Option<f32>) -> Self {
        self.target_fps = fps;
        self
    }

    /// Stop after `frames` frames
    #[must_use]
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Stop after `seconds` seconds
    #[must_use]
    pub fn with_max_seconds(mut self, seconds: f32) -> Self {
        self.max_seconds = Some(seconds);
        self
    }

    /// Parsed log level, falling back to `Info` on unknown names
    pub fn level_filter(&self) -> log::LevelFilter {
        log::LevelFilter::from_str(&self.log_level).unwrap_or(log::LevelFilter::Info)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(fps) = self.target_fps {
            if !(fps.is_finite() && fps > 0.0) {
                return Err(format!("Target FPS must be positive, got {fps}"));
            }
        }
        if let Some(seconds) = self.max_seconds {
            if !(seconds.is_finite() && seconds >= 0.0) {
                return Err(format!("Max seconds must be non-negative, got {seconds}"));
            }
        }
        if log::LevelFilter::from_str(&self.log_level).is_err() {
            return Err(format!("Unknown log level: {}", self.log_level));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Asset Configuration
///
/// Where relative asset paths are resolved from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Base directory for assets
    pub assets_dir: String,
}

impl AssetConfig {
    /// Create a new asset configuration
    pub fn new() -> Self {
        Self {
            assets_dir: ".".to_string(),
        }
    }

    /// Set assets directory
    #[must_use]
    pub fn with_assets_dir(mut self, dir: impl Into<String>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Resolve `path` against the assets directory (absolute paths pass through)
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(&self.assets_dir).join(path)
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Body geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryConfig {
    /// Axis-aligned cube
    Cube {
        /// Cube center in the body's local frame
        center: [f32; 3],
        /// Half of the edge length
        half_extent: f32,
    },
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self::Cube {
            center: [0.0, 0.0, 0.0],
            half_extent: 1.0,
        }
    }
}

/// Body surface appearance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppearanceConfig {
    /// Per-vertex colors
    #[default]
    VertexColors,
    /// Image texture; falls back to untextured if the file can't be read
    Texture {
        /// Image path, relative to [`AssetConfig::assets_dir`]
        path: String,
    },
}

/// Continuous rotation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Rotation axis direction (any non-zero length)
    pub axis: [f32; 3],
    /// Angular speed
    pub degrees_per_second: f32,
    /// Start timing at scene construction instead of at the first frame
    pub start_at_construction: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            axis: DEFAULT_AXIS,
            degrees_per_second: DEFAULT_DEGREES_PER_SECOND,
            start_at_construction: false,
        }
    }
}

/// One rigid body: a transform node holding a single drawable
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Debug name for the body's transform node
    pub name: Option<String>,
    /// Geometry
    pub geometry: GeometryConfig,
    /// Appearance
    pub appearance: AppearanceConfig,
    /// Initial translation of the transform node
    pub translation: [f32; 3],
    /// Rotation animation, if the body spins
    pub rotation: Option<RotationConfig>,
}

impl BodyConfig {
    /// Spinning vertex-colored cube
    pub fn spinning_cube(name: &str, center: [f32; 3], half_extent: f32) -> Self {
        Self {
            name: Some(name.to_string()),
            geometry: GeometryConfig::Cube { center, half_extent },
            appearance: AppearanceConfig::VertexColors,
            translation: [0.0; 3],
            rotation: Some(RotationConfig::default()),
        }
    }
}

/// Built-in scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenePreset {
    /// One spinning colored cube
    SingleCube,
    /// Two independently spinning cubes under a shared group
    CubeGroup,
    /// One spinning textured cube
    TexturedCube,
}

impl FromStr for ScenePreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" | "single_cube" => Ok(Self::SingleCube),
            "group" | "cube_group" => Ok(Self::CubeGroup),
            "textured" | "textured_cube" => Ok(Self::TexturedCube),
            other => Err(ConfigError::Invalid(format!("Unknown scene preset: {other}"))),
        }
    }
}

/// # Scene Configuration
///
/// Geometry, appearance, and grouping of every body in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Put body transforms under a shared group root; otherwise a single
    /// body's transform becomes the root itself
    pub grouped: bool,
    /// Bodies in traversal order
    pub bodies: Vec<BodyConfig>,
}

impl SceneConfig {
    /// One unit cube at the origin spinning at 60 deg/s about (2, 1, 1)
    pub fn single_cube() -> Self {
        Self {
            grouped: false,
            bodies: vec![BodyConfig::spinning_cube("cube", [0.0, 0.0, 0.0], 1.0)],
        }
    }

    /// The unit cube plus a second cube spanning (-5,-3,-3)..(-3,-1,-1),
    /// each with its own rotation, under one group
    pub fn cube_group() -> Self {
        Self {
            grouped: true,
            bodies: vec![
                BodyConfig::spinning_cube("cube", [0.0, 0.0, 0.0], 1.0),
                BodyConfig::spinning_cube("offset_cube", [-4.0, -2.0, -2.0], 1.0),
            ],
        }
    }

    /// The unit cube textured with `texture.png`
    pub fn textured_cube() -> Self {
        let mut body = BodyConfig::spinning_cube("textured_cube", [0.0, 0.0, 0.0], 1.0);
        body.appearance = AppearanceConfig::Texture {
            path: "texture.png".to_string(),
        };
        Self {
            grouped: false,
            bodies: vec![body],
        }
    }

    /// Scene for a built-in preset
    pub fn preset(preset: ScenePreset) -> Self {
        match preset {
            ScenePreset::SingleCube => Self::single_cube(),
            ScenePreset::CubeGroup => Self::cube_group(),
            ScenePreset::TexturedCube => Self::textured_cube(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.bodies.is_empty() {
            return Err("Scene must contain at least one body".to_string());
        }
        if !self.grouped && self.bodies.len() > 1 {
            return Err(format!(
                "{} bodies need `grouped = true` to share a root",
                self.bodies.len()
            ));
        }
        for (index, body) in self.bodies.iter().enumerate() {
            let GeometryConfig::Cube { half_extent, .. } = body.geometry;
            if !(half_extent.is_finite() && half_extent > 0.0) {
                return Err(format!("Body {index}: cube half extent must be positive"));
            }
            if let Some(rotation) = &body.rotation {
                if !rotation.degrees_per_second.is_finite() {
                    return Err(format!("Body {index}: angular speed must be finite"));
                }
            }
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::single_cube()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Frame driver configuration
    pub engine: EngineConfig,
    /// Asset system configuration
    pub assets: AssetConfig,
    /// Scene description
    pub scene: SceneConfig,
}

impl ApplicationConfig {
    /// Configuration for a built-in scene preset
    pub fn from_preset(preset: ScenePreset) -> Self {
        Self {
            scene: SceneConfig::preset(preset),
            ..Self::default()
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate().map_err(ConfigError::Invalid)?;
        self.scene.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}
