use std::fmt;

use thiserror::Error;

/// Grid axis named in placement diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Z => f.write_str("z"),
        }
    }
}

/// Failure of a single composition. Raised before any cell is classified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComposeError {
    #[error("grid dimensions must be between 1 and 2^31-1 cells, got {width}x{height}")]
    InvalidGrid { width: u32, height: u32 },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Configuration values that cannot produce a valid sampling window.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error(
        "quarry of size {size} does not fit the {axis} axis: quarter span {quarter} leaves a window of {window}"
    )]
    QuarryWindow {
        axis: Axis,
        quarter: i64,
        size: u32,
        window: i64,
    },
    #[error("special clearing needs at least {required} cells on the {axis} axis, grid has {extent}")]
    SpecialAreaWindow {
        axis: Axis,
        extent: u32,
        required: u32,
    },
    #[error("percent offset must lie in 0..=100, got {0}")]
    PercentOffset(f32),
    #[error("{field} must be at most {limit}, got {value}")]
    RegionExtent {
        field: &'static str,
        value: u32,
        limit: u32,
    },
    #[error("outer radius delta must lie within +/-{limit}, got {delta}")]
    OuterRadiusDelta { delta: i32, limit: u32 },
    #[error("inner clearing size must be positive, got {x}x{z}")]
    InnerAreaSize { x: u32, z: u32 },
    #[error("quarry size must be positive")]
    QuarrySize,
    #[error("movement difficulty must be a finite positive value, got {0}")]
    MovementDifficulty(f32),
}
