use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    config::{ComposerConfig, InnerAreaConfig, InnerShape, OuterShape},
    error::{Axis, ComposeError, ConfigurationError},
    grid::{GridPos, GridSize},
    result::{CellClass, CellState, GenerationResult, PlacedRegions},
    shape::{BoundingBox, ShapeRegion},
};

/// Corner boxes of this size never become impenetrable, keeping map entries open.
pub const CORNER_MARGIN: i32 = 6;
/// Extra reach of the rubble ring around a round mountain.
pub const ROUGH_HALO: i32 = 8;
pub const SPECIAL_AREA_RADIUS: i32 = 20;
/// Minimum distance from a grid edge to the special clearing's center.
pub const SPECIAL_AREA_INSET: u32 = 30;

const ROCK_ROLL: u32 = 42;
const ROCK_HITS: u32 = 5;
const QUARRY_GAP: i32 = 2;

/// Per-call caller state. Replaces host-wide flags so nothing leaks between
/// compositions.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Carve the fixed-radius clearing used by quest sites.
    pub wants_special_area: bool,
    /// Road and river cells the host keeps open on filled maps unless
    /// `cover_road_and_river` is set.
    pub preserved_cells: Vec<GridPos>,
}

impl GenerationContext {
    pub fn with_special_area() -> Self {
        Self {
            wants_special_area: true,
            ..Self::default()
        }
    }
}

/// Paints the impassable terrain classification for one grid.
#[derive(Debug, Clone, Copy)]
pub struct RegionComposer<'a> {
    config: &'a ComposerConfig,
}

impl<'a> RegionComposer<'a> {
    pub fn new(config: &'a ComposerConfig) -> Self {
        Self { config }
    }

    /// Classifies every cell of a `width`×`height` grid.
    ///
    /// Deterministic for a given seed: every random decision is drawn from a
    /// single ChaCha stream in a fixed order (clearing, special area, quarry,
    /// then the cells in row-major order). Fails before touching any cell
    /// when the grid or a placement window is invalid.
    pub fn compose(
        &self,
        width: u32,
        height: u32,
        seed: u64,
        ctx: &GenerationContext,
    ) -> Result<GenerationResult, ComposeError> {
        let size = GridSize::new(width, height)?;
        self.config.validate()?;
        self.check_windows(size, ctx)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let outer_radius = outer_radius(size, self.config.outer_radius_delta);

        let mut regions = PlacedRegions::default();
        if self.config.inner_area.enabled {
            regions.clearing = Some(place_clearing(&mut rng, size, &self.config.inner_area));
        }
        if ctx.wants_special_area {
            regions.special_area = Some(place_special_area(&mut rng, size));
        }
        if self.config.quarry.enabled {
            regions.quarry = Some(place_quarry(
                &mut rng,
                size,
                regions.clearing.as_ref(),
                self.config.quarry.size,
            ));
        }

        tracing::debug!(
            target: "impassable::compose",
            width,
            height,
            seed,
            outer_radius,
            shape = ?self.config.outer_shape,
            clearing = ?regions.clearing,
            quarry = ?regions.quarry,
            special_area = ?regions.special_area,
            "compose.regions_placed"
        );

        let preserved = self.preserved_mask(size, ctx);
        let fill = self.config.outer_shape == OuterShape::Fill;
        let bands = EdgeBands::clamped(self.config, size);
        let smoothness = self.config.inner_area.wall_smoothness;

        let mut cells = Vec::with_capacity(size.cell_count());
        let mut inner_area = vec![false; size.cell_count()];
        for (idx, pos) in size.positions().enumerate() {
            let mut class = if self.is_mountain(pos, size, outer_radius, bands) {
                CellClass::Impenetrable
            } else if self.config.scattered_rocks
                && self.is_scattered_rock(pos, size, outer_radius, &mut rng)
            {
                CellClass::Rough
            } else {
                CellClass::Normal
            };

            if inside(regions.special_area.as_ref(), pos) {
                class = CellClass::Cleared;
            } else if inside(regions.quarry.as_ref(), pos) {
                class = CellClass::Normal;
            } else if let Some(clearing) = regions.clearing.as_ref() {
                let jitter = if smoothness == 0 {
                    0
                } else {
                    rng.gen_range(0..smoothness) as i32
                };
                if clearing.is_inside(pos, jitter) {
                    class = CellClass::Cleared;
                    inner_area[idx] = true;
                }
            }

            if fill {
                if size.within_edge_band(pos, bands.rim_depth) {
                    class = CellClass::Normal;
                    inner_area[idx] = false;
                } else if class == CellClass::Impenetrable && preserved.get(idx) == Some(&true) {
                    class = CellClass::Normal;
                }
            }

            cells.push(CellState::new(class));
        }

        let start_spot = if self.config.inner_area.start_inside {
            regions.clearing.as_ref().map(ShapeRegion::center)
        } else {
            None
        };

        let result = GenerationResult::new(size, cells, inner_area, regions, start_spot);
        tracing::debug!(
            target: "impassable::compose",
            width,
            height,
            seed,
            impenetrable = result.count(CellClass::Impenetrable),
            cleared = result.count(CellClass::Cleared),
            "compose.finished"
        );
        Ok(result)
    }

    /// Like [`compose`](Self::compose) but logs the failure and returns
    /// `None`, leaving the host's default terrain untouched.
    pub fn compose_or_skip(
        &self,
        width: u32,
        height: u32,
        seed: u64,
        ctx: &GenerationContext,
    ) -> Option<GenerationResult> {
        match self.compose(width, height, seed, ctx) {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::warn!(
                    target: "impassable::compose",
                    width,
                    height,
                    seed,
                    error = %err,
                    "compose.skipped"
                );
                None
            }
        }
    }

    fn check_windows(
        &self,
        size: GridSize,
        ctx: &GenerationContext,
    ) -> Result<(), ConfigurationError> {
        let axes = [(Axis::X, size.width), (Axis::Z, size.height)];
        if self.config.quarry.enabled {
            let quarry = self.config.quarry.size;
            for (axis, extent) in axes {
                let quarter = i64::from(extent / 4);
                let window = quarter - 2 * i64::from(quarry);
                if window <= 0 {
                    return Err(ConfigurationError::QuarryWindow {
                        axis,
                        quarter,
                        size: quarry,
                        window,
                    });
                }
            }
        }
        if ctx.wants_special_area {
            let required = SPECIAL_AREA_INSET * 2;
            for (axis, extent) in axes {
                if extent < required {
                    return Err(ConfigurationError::SpecialAreaWindow {
                        axis,
                        extent,
                        required,
                    });
                }
            }
        }
        Ok(())
    }

    fn preserved_mask(&self, size: GridSize, ctx: &GenerationContext) -> Vec<bool> {
        if self.config.outer_shape != OuterShape::Fill
            || self.config.cover_road_and_river
            || ctx.preserved_cells.is_empty()
        {
            return Vec::new();
        }
        let mut mask = vec![false; size.cell_count()];
        for idx in ctx
            .preserved_cells
            .iter()
            .filter_map(|pos| size.index_of(*pos))
        {
            mask[idx] = true;
        }
        mask
    }

    fn is_mountain(
        &self,
        pos: GridPos,
        size: GridSize,
        outer_radius: i32,
        bands: EdgeBands,
    ) -> bool {
        let buffer = bands.buffer;
        match self.config.outer_shape {
            OuterShape::Fill => {
                !(bands.rim_depth > 0 && size.within_corner_box(pos, CORNER_MARGIN))
            }
            OuterShape::Round => {
                if size.within_corner_box(pos, CORNER_MARGIN) {
                    return false;
                }
                if buffer > 0 && size.within_edge_band(pos, buffer.saturating_add(1)) {
                    return false;
                }
                within_radius(pos, grid_center(size), outer_radius)
            }
            OuterShape::Square => {
                !size.within_corner_box(pos, CORNER_MARGIN)
                    && !size.within_edge_band(pos, buffer.saturating_add(1))
            }
        }
    }

    fn is_scattered_rock(
        &self,
        pos: GridPos,
        size: GridSize,
        outer_radius: i32,
        rng: &mut ChaCha8Rng,
    ) -> bool {
        if rng.gen_range(0..ROCK_ROLL) >= ROCK_HITS {
            return false;
        }
        match self.config.outer_shape {
            OuterShape::Round => {
                within_radius(pos, grid_center(size), outer_radius.saturating_add(ROUGH_HALO))
            }
            OuterShape::Square | OuterShape::Fill => true,
        }
    }
}

/// Perimeter buffer and Fill rim depth, clamped to the grid so both the
/// mountain test and the rim pass see the same values.
#[derive(Debug, Clone, Copy)]
struct EdgeBands {
    buffer: i32,
    rim_depth: i32,
}

impl EdgeBands {
    fn clamped(config: &ComposerConfig, size: GridSize) -> Self {
        // GridSize keeps both extents within i32.
        let extent = size.width.max(size.height);
        Self {
            buffer: config.perimeter_buffer.min(extent) as i32,
            rim_depth: config.roof_edge_depth.min(extent) as i32,
        }
    }
}

/// Convenience wrapper around [`RegionComposer::compose`].
pub fn compose(
    width: u32,
    height: u32,
    seed: u64,
    config: &ComposerConfig,
    ctx: &GenerationContext,
) -> Result<GenerationResult, ComposeError> {
    RegionComposer::new(config).compose(width, height, seed, ctx)
}

/// `round((width + height) / 4) + delta`, saturating at the `i32` range.
pub fn outer_radius(size: GridSize, delta: i32) -> i32 {
    let span = (size.width as f64 + size.height as f64) * 0.25;
    (span.round() as i32).saturating_add(delta)
}

fn grid_center(size: GridSize) -> GridPos {
    GridPos::new((size.width / 2) as i32, (size.height / 2) as i32)
}

fn within_radius(pos: GridPos, center: GridPos, radius: i32) -> bool {
    if radius <= 0 {
        return false;
    }
    let r = radius as i64;
    pos.distance_sq(center) < r * r
}

fn inside(region: Option<&ShapeRegion>, pos: GridPos) -> bool {
    region.is_some_and(|region| region.is_inside(pos, 0))
}

fn place_clearing(rng: &mut ChaCha8Rng, size: GridSize, cfg: &InnerAreaConfig) -> ShapeRegion {
    let center_x = jittered_center(rng, size.width, cfg.percent_offset);
    let center_z = jittered_center(rng, size.height, cfg.percent_offset);
    match cfg.shape {
        InnerShape::Square => {
            let half_x = (cfg.size_x / 2) as i32;
            let half_z = (cfg.size_z / 2) as i32;
            ShapeRegion::rectangle(
                center_x - half_x,
                center_z - half_z,
                center_x + half_x,
                center_z + half_z,
            )
        }
        InnerShape::Round => {
            ShapeRegion::circle(GridPos::new(center_x, center_z), (cfg.size_x / 2) as i32)
        }
    }
}

// The jitter draw always consumes the stream, even when the bound rounds to 0.
fn jittered_center(rng: &mut ChaCha8Rng, extent: u32, percent_offset: f32) -> i32 {
    let half = (extent / 2) as i32;
    let bound = (0.01 * percent_offset as f64 * half as f64).floor() as i32;
    let mut delta = rng.gen_range(0..bound.max(1));
    if rng.gen_range(0..2u32) == 0 {
        delta = -delta;
    }
    half + delta
}

fn place_special_area(rng: &mut ChaCha8Rng, size: GridSize) -> ShapeRegion {
    let x = rng.gen_range(SPECIAL_AREA_INSET..=size.width - SPECIAL_AREA_INSET);
    let z = rng.gen_range(SPECIAL_AREA_INSET..=size.height - SPECIAL_AREA_INSET);
    ShapeRegion::circle(GridPos::new(x as i32, z as i32), SPECIAL_AREA_RADIUS)
}

fn place_quarry(
    rng: &mut ChaCha8Rng,
    size: GridSize,
    clearing: Option<&ShapeRegion>,
    quarry_size: u32,
) -> ShapeRegion {
    let quarter_x = (size.width / 4) as i32;
    let quarter_z = (size.height / 4) as i32;
    let reference = clearing
        .map(ShapeRegion::bounding_box)
        .unwrap_or(BoundingBox {
            low_x: quarter_x * 2,
            high_x: quarter_x * 2,
            low_z: quarter_z * 2,
            high_z: quarter_z * 2,
        });
    let q = quarry_size as i32;
    let (low_x, high_x) = quarry_span(rng, reference.low_x, reference.high_x, quarter_x, q);
    let (low_z, high_z) = quarry_span(rng, reference.low_z, reference.high_z, quarter_z, q);
    ShapeRegion::rectangle(low_x, low_z, high_x, high_z)
}

/// Picks the quarry extent on one axis, on a coin-chosen side of the
/// reference span with a fixed gap.
fn quarry_span(
    rng: &mut ChaCha8Rng,
    ref_low: i32,
    ref_high: i32,
    quarter: i32,
    q: i32,
) -> (i32, i32) {
    if rng.gen_range(0..2u32) == 0 {
        let high = ref_low - QUARRY_GAP;
        let anchor = random_placement(rng, high - quarter, high, q);
        (anchor - q, anchor)
    } else {
        let low = ref_high + QUARRY_GAP;
        let anchor = random_placement(rng, low, low + quarter, q);
        (anchor, anchor + q)
    }
}

fn random_placement(rng: &mut ChaCha8Rng, low: i32, high: i32, size: i32) -> i32 {
    rng.gen_range(low + size..high - size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(shape: OuterShape) -> ComposerConfig {
        let mut config = ComposerConfig {
            outer_shape: shape,
            scattered_rocks: false,
            ..ComposerConfig::default()
        };
        config.inner_area.enabled = false;
        config
    }

    fn class(result: &GenerationResult, x: i32, z: i32) -> CellClass {
        result.class_at(GridPos::new(x, z)).unwrap()
    }

    #[test]
    fn outer_radius_rounds_quarter_perimeter() {
        let size = GridSize::new(250, 250).unwrap();
        assert_eq!(outer_radius(size, 1), 126);
        let size = GridSize::new(101, 100).unwrap();
        assert_eq!(outer_radius(size, 0), 50);
        let size = GridSize::new(102, 100).unwrap();
        assert_eq!(outer_radius(size, -2), 49);
    }

    #[test]
    fn small_square_grid_has_no_impenetrable_cells() {
        let config = bare(OuterShape::Square);
        let result = compose(10, 10, 1, &config, &GenerationContext::default()).unwrap();
        assert_eq!(result.count(CellClass::Impenetrable), 0);
        assert_eq!(result.count(CellClass::Normal), 100);
    }

    #[test]
    fn square_interior_is_strictly_inside_buffer() {
        let config = bare(OuterShape::Square);
        let result = compose(40, 30, 1, &config, &GenerationContext::default()).unwrap();
        assert_eq!(class(&result, 6, 15), CellClass::Normal);
        assert_eq!(class(&result, 7, 15), CellClass::Impenetrable);
        assert_eq!(class(&result, 32, 15), CellClass::Impenetrable);
        assert_eq!(class(&result, 33, 15), CellClass::Normal);
        assert_eq!(class(&result, 20, 7), CellClass::Impenetrable);
        assert_eq!(class(&result, 20, 23), CellClass::Normal);
        assert_eq!(result.count(CellClass::Impenetrable), 26 * 16);
    }

    #[test]
    fn square_with_clearing_renders() {
        let mut config = bare(OuterShape::Square);
        config.perimeter_buffer = 2;
        config.inner_area.enabled = true;
        config.inner_area.percent_offset = 0.0;
        config.inner_area.wall_smoothness = 0;
        config.inner_area.size_x = 4;
        config.inner_area.size_z = 2;
        let result = compose(20, 16, 0, &config, &GenerationContext::default()).unwrap();
        insta::assert_snapshot!(result.to_ascii().trim_end(), @r"
        ....................
        ....................
        ....................
        ......########......
        ......########......
        ......########......
        ...##############...
        ...#####     ####...
        ...#####     ####...
        ...#####     ####...
        ......########......
        ......########......
        ......########......
        ....................
        ....................
        ....................
        ");
    }

    #[test]
    fn round_boundary_is_strict() {
        let mut config = bare(OuterShape::Round);
        config.outer_radius_delta = -30;
        let result = compose(100, 100, 9, &config, &GenerationContext::default()).unwrap();
        assert_eq!(class(&result, 50, 50), CellClass::Impenetrable);
        assert_eq!(class(&result, 50, 69), CellClass::Impenetrable);
        assert_eq!(class(&result, 50, 70), CellClass::Normal);
        assert_eq!(class(&result, 50, 71), CellClass::Normal);
        assert_eq!(class(&result, 30, 50), CellClass::Normal);
        assert_eq!(class(&result, 31, 50), CellClass::Impenetrable);
    }

    #[test]
    fn round_respects_perimeter_buffer() {
        let mut config = bare(OuterShape::Round);
        config.outer_radius_delta = 40;
        let result = compose(60, 60, 3, &config, &GenerationContext::default()).unwrap();
        assert_eq!(class(&result, 6, 30), CellClass::Normal);
        assert_eq!(class(&result, 7, 30), CellClass::Impenetrable);
        assert_eq!(class(&result, 53, 30), CellClass::Normal);
    }

    #[test]
    fn round_rubble_stays_inside_halo() {
        let mut config = bare(OuterShape::Round);
        config.scattered_rocks = true;
        config.outer_radius_delta = -30;
        let result = compose(100, 100, 21, &config, &GenerationContext::default()).unwrap();
        let center = GridPos::new(50, 50);
        assert!(result.count(CellClass::Rough) > 0);
        for (pos, cell) in result.iter() {
            if cell.class == CellClass::Rough {
                assert!(pos.distance_sq(center) < 28 * 28, "rubble at {pos:?}");
                assert!(pos.distance_sq(center) >= 20 * 20);
            }
        }
    }

    #[test]
    fn fill_keeps_rim_and_corners_open() {
        let config = bare(OuterShape::Fill);
        let result = compose(30, 30, 5, &config, &GenerationContext::default()).unwrap();
        assert_eq!(class(&result, 4, 15), CellClass::Normal);
        assert_eq!(class(&result, 5, 15), CellClass::Impenetrable);
        assert_eq!(class(&result, 5, 5), CellClass::Normal);
        assert_eq!(class(&result, 24, 24), CellClass::Normal);
        assert_eq!(class(&result, 25, 15), CellClass::Normal);
        assert_eq!(class(&result, 6, 6), CellClass::Impenetrable);
        assert!(!result.is_roofed(GridPos::new(0, 0)));
        assert!(result.is_roofed(GridPos::new(15, 15)));
    }

    #[test]
    fn fill_without_rim_covers_everything() {
        let mut config = bare(OuterShape::Fill);
        config.roof_edge_depth = 0;
        let result = compose(20, 20, 5, &config, &GenerationContext::default()).unwrap();
        assert_eq!(result.count(CellClass::Impenetrable), 400);
    }

    #[test]
    fn preserved_cells_open_unless_covered() {
        let mut config = bare(OuterShape::Fill);
        let road: Vec<GridPos> = (0..30).map(|x| GridPos::new(x, 15)).collect();
        let ctx = GenerationContext {
            wants_special_area: false,
            preserved_cells: road,
        };
        let open = compose(30, 30, 5, &config, &ctx).unwrap();
        assert_eq!(class(&open, 15, 15), CellClass::Normal);
        assert_eq!(class(&open, 15, 16), CellClass::Impenetrable);

        config.cover_road_and_river = true;
        let covered = compose(30, 30, 5, &config, &ctx).unwrap();
        assert_eq!(class(&covered, 15, 15), CellClass::Impenetrable);
    }

    #[test]
    fn clearing_is_cleared_and_recorded() {
        let mut config = bare(OuterShape::Square);
        config.inner_area.enabled = true;
        config.inner_area.wall_smoothness = 0;
        config.inner_area.percent_offset = 0.0;
        config.inner_area.size_x = 20;
        config.inner_area.size_z = 10;
        let result = compose(100, 80, 11, &config, &GenerationContext::default()).unwrap();
        assert_eq!(
            result.clearing(),
            Some(&ShapeRegion::rectangle(40, 35, 60, 45))
        );
        assert_eq!(class(&result, 40, 35), CellClass::Cleared);
        assert_eq!(class(&result, 60, 45), CellClass::Cleared);
        assert_eq!(class(&result, 61, 45), CellClass::Impenetrable);
        assert!(result.is_inner_area(GridPos::new(50, 40)));
        assert!(!result.is_inner_area(GridPos::new(61, 40)));
        assert_eq!(result.count(CellClass::Cleared), 21 * 11);
    }

    #[test]
    fn round_clearing_uses_half_size_radius() {
        let mut config = bare(OuterShape::Square);
        config.inner_area.enabled = true;
        config.inner_area.shape = InnerShape::Round;
        config.inner_area.wall_smoothness = 0;
        config.inner_area.percent_offset = 0.0;
        config.inner_area.size_x = 20;
        let result = compose(80, 80, 2, &config, &GenerationContext::default()).unwrap();
        assert_eq!(
            result.clearing(),
            Some(&ShapeRegion::circle(GridPos::new(40, 40), 10))
        );
        assert_eq!(class(&result, 40, 40), CellClass::Cleared);
        assert_eq!(class(&result, 49, 40), CellClass::Cleared);
        assert_eq!(class(&result, 50, 40), CellClass::Impenetrable);
    }

    #[test]
    fn clearing_center_stays_within_offset_bound() {
        let mut config = bare(OuterShape::Square);
        config.inner_area.enabled = true;
        config.inner_area.percent_offset = 10.0;
        for seed in 0..64 {
            let result = compose(200, 160, seed, &config, &GenerationContext::default()).unwrap();
            let center = result.clearing().unwrap().center();
            assert!((center.x - 100).abs() < 10, "seed {seed}: {center:?}");
            assert!((center.z - 80).abs() < 8, "seed {seed}: {center:?}");
        }
    }

    #[test]
    fn start_spot_follows_clearing() {
        let mut config = ComposerConfig::default();
        config.inner_area.start_inside = true;
        let result = compose(120, 120, 4, &config, &GenerationContext::default()).unwrap();
        let start = result.start_spot().unwrap();
        assert_eq!(start, result.clearing().unwrap().center());
        assert_eq!(result.class_at(start), Some(CellClass::Cleared));

        config.inner_area.enabled = false;
        let result = compose(120, 120, 4, &config, &GenerationContext::default()).unwrap();
        assert_eq!(result.start_spot(), None);
    }

    #[test]
    fn special_area_clears_fixed_circle() {
        let config = bare(OuterShape::Fill);
        let result = compose(100, 100, 8, &config, &GenerationContext::with_special_area()).unwrap();
        let special = *result.special_area().unwrap();
        let center = special.center();
        assert!((30..=70).contains(&center.x));
        assert!((30..=70).contains(&center.z));
        assert_eq!(result.class_at(center), Some(CellClass::Cleared));
        assert!(!result.is_roofed(center));
        assert_eq!(special.bounding_box().high_x - center.x, SPECIAL_AREA_RADIUS);
    }

    #[test]
    fn special_area_needs_room() {
        let config = bare(OuterShape::Square);
        let err = compose(59, 100, 8, &config, &GenerationContext::with_special_area()).unwrap_err();
        assert_eq!(
            err,
            ComposeError::Configuration(ConfigurationError::SpecialAreaWindow {
                axis: Axis::X,
                extent: 59,
                required: 60,
            })
        );
    }

    #[test]
    fn quarry_is_flat_and_unroofed() {
        let mut config = ComposerConfig::default();
        config.quarry.enabled = true;
        let result = compose(250, 250, 17, &config, &GenerationContext::default()).unwrap();
        let quarry = *result.quarry().unwrap();
        let bb = quarry.bounding_box();
        assert_eq!(bb.high_x - bb.low_x, 5);
        assert_eq!(bb.high_z - bb.low_z, 5);
        for (pos, cell) in result.iter() {
            if quarry.is_inside(pos, 0) {
                assert_eq!(cell.class, CellClass::Normal);
                assert!(!cell.roofed);
            }
        }
    }

    #[test]
    fn quarry_without_clearing_anchors_on_grid_middle() {
        let mut config = bare(OuterShape::Square);
        config.quarry.enabled = true;
        for seed in 0..32 {
            let result = compose(120, 120, seed, &config, &GenerationContext::default()).unwrap();
            let bb = result.quarry().unwrap().bounding_box();
            assert!(bb.high_x < 60 - 1 || bb.low_x > 60 + 1);
            assert!(bb.high_z < 60 - 1 || bb.low_z > 60 + 1);
            assert!(bb.low_x >= 60 - 2 - 30 && bb.high_x <= 60 + 2 + 30);
        }
    }

    #[test]
    fn collapsed_quarry_window_is_rejected() {
        let mut config = bare(OuterShape::Square);
        config.quarry.enabled = true;
        config.quarry.size = 10;
        let err = compose(80, 200, 1, &config, &GenerationContext::default()).unwrap_err();
        assert_eq!(
            err,
            ComposeError::Configuration(ConfigurationError::QuarryWindow {
                axis: Axis::X,
                quarter: 20,
                size: 10,
                window: 0,
            })
        );
    }

    #[test]
    fn oversized_perimeter_buffer_leaves_no_mountain() {
        for shape in [OuterShape::Square, OuterShape::Round] {
            for buffer in [25, u32::MAX, i32::MAX as u32, i32::MAX as u32 + 1] {
                let mut config = bare(shape);
                config.perimeter_buffer = buffer;
                config.outer_radius_delta = 40;
                let result = compose(50, 50, 1, &config, &GenerationContext::default()).unwrap();
                assert_eq!(
                    result.count(CellClass::Impenetrable),
                    0,
                    "{shape:?} with buffer {buffer}"
                );
            }
        }
    }

    #[test]
    fn oversized_rim_opens_whole_fill_map() {
        for depth in [15, u32::MAX, i32::MAX as u32 + 1] {
            let mut config = bare(OuterShape::Fill);
            config.roof_edge_depth = depth;
            let result = compose(30, 30, 5, &config, &GenerationContext::default()).unwrap();
            assert_eq!(result.count(CellClass::Normal), 900, "depth {depth}");
        }
    }

    #[test]
    fn oversized_quarry_reports_window() {
        let mut config = bare(OuterShape::Square);
        config.quarry.enabled = true;
        config.quarry.size = u32::MAX;
        let err = compose(250, 250, 1, &config, &GenerationContext::default()).unwrap_err();
        assert_eq!(
            err,
            ComposeError::Configuration(ConfigurationError::QuarryWindow {
                axis: Axis::X,
                quarter: 62,
                size: u32::MAX,
                window: 62 - 2 * i64::from(u32::MAX),
            })
        );
    }

    #[test]
    fn outer_radius_saturates() {
        let size = GridSize::new(250, 250).unwrap();
        assert_eq!(outer_radius(size, i32::MAX), i32::MAX);
        assert_eq!(outer_radius(size, i32::MIN), i32::MIN + 125);
    }

    #[test]
    fn extreme_offsets_fail_before_placement() {
        let mut config = ComposerConfig::default();
        config.outer_radius_delta = i32::MAX;
        let err = compose(250, 250, 1, &config, &GenerationContext::default()).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::Configuration(ConfigurationError::OuterRadiusDelta { .. })
        ));

        let mut config = ComposerConfig::default();
        config.inner_area.percent_offset = f32::MAX;
        let err = compose(250, 250, 1, &config, &GenerationContext::default()).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::Configuration(ConfigurationError::PercentOffset(_))
        ));

        config.inner_area.percent_offset = 100.0;
        for seed in 0..32 {
            let result = compose(250, 250, seed, &config, &GenerationContext::default()).unwrap();
            let center = result.clearing().unwrap().center();
            assert!((0..250).contains(&center.x), "seed {seed}: {center:?}");
            assert!((0..250).contains(&center.z), "seed {seed}: {center:?}");
        }
    }

    #[test]
    fn invalid_grid_is_rejected() {
        let config = ComposerConfig::default();
        let err = compose(0, 10, 1, &config, &GenerationContext::default()).unwrap_err();
        assert_eq!(err, ComposeError::InvalidGrid { width: 0, height: 10 });
        let composer = RegionComposer::new(&config);
        assert!(composer
            .compose_or_skip(10, 0, 1, &GenerationContext::default())
            .is_none());
    }

    #[test]
    fn zero_offset_bound_still_consumes_a_draw() {
        // Tiny grids round the jitter bound to zero; the clearing must still
        // be centred on the grid midpoint.
        let mut config = bare(OuterShape::Square);
        config.inner_area.enabled = true;
        config.inner_area.size_x = 4;
        config.inner_area.size_z = 4;
        let result = compose(20, 20, 6, &config, &GenerationContext::default()).unwrap();
        assert_eq!(result.clearing().unwrap().center(), GridPos::new(10, 10));
    }
}
