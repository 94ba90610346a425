//! Deterministic impassable-terrain composer.
//!
//! Paints an elevation class and roof flag for every cell of a rectangular
//! grid when [`RegionComposer::compose`] is invoked: an outer mountain
//! silhouette, a jittered inner clearing, and optional quarry and quest
//! clearings. The [`world_tiles`] module carries the companion world-map
//! rules that keep impassable tiles reachable and settleable.

mod composer;
pub mod config;
mod error;
mod grid;
mod result;
pub mod seed;
mod shape;
pub mod world_tiles;

pub use composer::{
    compose, outer_radius, GenerationContext, RegionComposer, CORNER_MARGIN, ROUGH_HALO,
    SPECIAL_AREA_INSET, SPECIAL_AREA_RADIUS,
};
pub use config::{
    load_composer_config_from_env, ComposerConfig, ComposerConfigError, ComposerConfigMetadata,
    InnerAreaConfig, InnerShape, OuterShape, QuarryConfig, WorldTileConfig, MAX_REGION_EXTENT,
};
pub use error::{Axis, ComposeError, ConfigurationError};
pub use grid::{GridPos, GridSize};
pub use result::{
    CellClass, CellState, GenerationResult, CLEARED_ELEVATION, IMPENETRABLE_ELEVATION,
    NORMAL_ELEVATION, ROUGH_ELEVATION,
};
pub use seed::{resolve_seed, seed_for_tile, FnvHasher};
pub use shape::{BoundingBox, ShapeRegion};
