//! Configuration for the impassable region composer.
//!
//! Loaded from `composer_config.json` with support for environment variable overrides.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use thiserror::Error;

use crate::error::ConfigurationError;

pub const BUILTIN_COMPOSER_CONFIG: &str = include_str!("data/composer_config.json");

/// Upper bound for clearing extents, wall smoothness, and the magnitude of
/// `outer_radius_delta`. Keeps placement arithmetic inside `i32`.
pub const MAX_REGION_EXTENT: u32 = 1 << 16;

/// Silhouette of the impenetrable mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum OuterShape {
    #[default]
    Square,
    Round,
    Fill,
}

/// Shape of the open area carved out of the mountain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum InnerShape {
    #[default]
    Square,
    Round,
}

/// Root configuration record, fixed for the duration of one composition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub outer_shape: OuterShape,
    pub outer_radius_delta: i32,
    pub perimeter_buffer: u32,
    pub inner_area: InnerAreaConfig,
    pub scattered_rocks: bool,
    pub quarry: QuarryConfig,
    pub roof_edge_depth: u32,
    pub cover_road_and_river: bool,
    pub true_random: bool,
    pub world: WorldTileConfig,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            outer_shape: OuterShape::Square,
            outer_radius_delta: 1,
            perimeter_buffer: 6,
            inner_area: InnerAreaConfig::default(),
            scattered_rocks: true,
            quarry: QuarryConfig::default(),
            roof_edge_depth: 5,
            cover_road_and_river: false,
            true_random: false,
            world: WorldTileConfig::default(),
        }
    }
}

/// Inner clearing. Sizes are full extents; a round clearing uses `size_x / 2`
/// as its radius.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InnerAreaConfig {
    pub enabled: bool,
    pub shape: InnerShape,
    pub size_x: u32,
    pub size_z: u32,
    pub percent_offset: f32,
    pub wall_smoothness: u32,
    pub start_inside: bool,
}

impl Default for InnerAreaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shape: InnerShape::Square,
            size_x: 54,
            size_z: 54,
            percent_offset: 5.0,
            wall_smoothness: 10,
            start_inside: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuarryConfig {
    pub enabled: bool,
    pub size: u32,
}

impl Default for QuarryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: 5,
        }
    }
}

/// World-map movement rules applied to impassable tiles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldTileConfig {
    pub movement_difficulty: f32,
}

impl Default for WorldTileConfig {
    fn default() -> Self {
        Self {
            movement_difficulty: 4.5,
        }
    }
}

impl ComposerConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_COMPOSER_CONFIG)
                .expect("builtin composer config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ComposerConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ComposerConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ComposerConfig::from_json_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the grid-independent fields. Placement windows that depend on
    /// the grid are checked by the composer.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let offset = self.inner_area.percent_offset;
        if !(0.0..=100.0).contains(&offset) {
            return Err(ConfigurationError::PercentOffset(offset));
        }
        if self.outer_radius_delta.unsigned_abs() > MAX_REGION_EXTENT {
            return Err(ConfigurationError::OuterRadiusDelta {
                delta: self.outer_radius_delta,
                limit: MAX_REGION_EXTENT,
            });
        }
        let inner = &self.inner_area;
        if inner.enabled && (inner.size_x == 0 || inner.size_z == 0) {
            return Err(ConfigurationError::InnerAreaSize {
                x: inner.size_x,
                z: inner.size_z,
            });
        }
        for (field, value) in [
            ("inner_area.size_x", inner.size_x),
            ("inner_area.size_z", inner.size_z),
            ("inner_area.wall_smoothness", inner.wall_smoothness),
        ] {
            if value > MAX_REGION_EXTENT {
                return Err(ConfigurationError::RegionExtent {
                    field,
                    value,
                    limit: MAX_REGION_EXTENT,
                });
            }
        }
        if self.quarry.enabled && self.quarry.size == 0 {
            return Err(ConfigurationError::QuarrySize);
        }
        let difficulty = self.world.movement_difficulty;
        if !difficulty.is_finite() || difficulty <= 0.0 {
            return Err(ConfigurationError::MovementDifficulty(difficulty));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ComposerConfigError {
    #[error("failed to parse composer config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read composer config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("composer config is invalid: {0}")]
    Invalid(#[from] ConfigurationError),
}

/// Tracks where the active composer config came from.
#[derive(Debug, Clone, Default)]
pub struct ComposerConfigMetadata {
    path: Option<PathBuf>,
}

impl ComposerConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Load composer configuration from `REGION_CONFIG_PATH` or the crate's
/// default data path, falling back to the builtin copy.
pub fn load_composer_config_from_env() -> (Arc<ComposerConfig>, ComposerConfigMetadata) {
    let path = env::var("REGION_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/data/composer_config.json")
        });

    match ComposerConfig::from_file(&path) {
        Ok(config) => {
            tracing::info!(
                target: "impassable::config",
                path = %path.display(),
                "composer_config.loaded=file"
            );
            (Arc::new(config), ComposerConfigMetadata::new(Some(path)))
        }
        Err(err) => {
            tracing::warn!(
                target: "impassable::config",
                path = %path.display(),
                error = %err,
                "composer_config.load_failed"
            );
            tracing::info!(
                target: "impassable::config",
                "composer_config.loaded=builtin"
            );
            (ComposerConfig::builtin(), ComposerConfigMetadata::new(None))
        }
    }
}
