#![allow(dead_code)]

use std::path::PathBuf;

use region_gen::{ComposerConfig, OuterShape};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Outer shape only: no clearing, no rubble, no quarry.
pub fn shape_only(shape: OuterShape) -> ComposerConfig {
    let mut config = ComposerConfig {
        outer_shape: shape,
        scattered_rocks: false,
        ..ComposerConfig::default()
    };
    config.inner_area.enabled = false;
    config
}

/// Every optional feature switched on.
pub fn everything(shape: OuterShape) -> ComposerConfig {
    let mut config = ComposerConfig {
        outer_shape: shape,
        ..ComposerConfig::default()
    };
    config.quarry.enabled = true;
    config.inner_area.start_inside = true;
    config
}
