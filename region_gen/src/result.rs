use std::hash::Hasher;

use serde::Serialize;

use crate::{
    grid::{GridPos, GridSize},
    seed::FnvHasher,
    shape::ShapeRegion,
};

/// Elevation written for impenetrable cells.
pub const IMPENETRABLE_ELEVATION: f32 = f32::MAX;
pub const ROUGH_ELEVATION: f32 = 0.75;
pub const NORMAL_ELEVATION: f32 = 0.57;
pub const CLEARED_ELEVATION: f32 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CellClass {
    Impenetrable,
    Rough,
    Normal,
    Cleared,
}

impl CellClass {
    pub fn elevation(self) -> f32 {
        match self {
            CellClass::Impenetrable => IMPENETRABLE_ELEVATION,
            CellClass::Rough => ROUGH_ELEVATION,
            CellClass::Normal => NORMAL_ELEVATION,
            CellClass::Cleared => CLEARED_ELEVATION,
        }
    }

    fn glyph(self) -> char {
        match self {
            CellClass::Impenetrable => '#',
            CellClass::Rough => '^',
            CellClass::Normal => '.',
            CellClass::Cleared => ' ',
        }
    }

    fn tag(self) -> u8 {
        match self {
            CellClass::Impenetrable => 0,
            CellClass::Rough => 1,
            CellClass::Normal => 2,
            CellClass::Cleared => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellState {
    pub class: CellClass,
    pub roofed: bool,
}

impl CellState {
    pub fn new(class: CellClass) -> Self {
        Self {
            class,
            roofed: class == CellClass::Impenetrable,
        }
    }
}

/// Output of one composition. Owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    size: GridSize,
    cells: Vec<CellState>,
    #[serde(skip)]
    inner_area: Vec<bool>,
    clearing: Option<ShapeRegion>,
    quarry: Option<ShapeRegion>,
    special_area: Option<ShapeRegion>,
    start_spot: Option<GridPos>,
}

impl GenerationResult {
    pub(crate) fn new(
        size: GridSize,
        cells: Vec<CellState>,
        inner_area: Vec<bool>,
        regions: PlacedRegions,
        start_spot: Option<GridPos>,
    ) -> Self {
        debug_assert_eq!(cells.len(), size.cell_count());
        debug_assert_eq!(inner_area.len(), size.cell_count());
        Self {
            size,
            cells,
            inner_area,
            clearing: regions.clearing,
            quarry: regions.quarry,
            special_area: regions.special_area,
            start_spot,
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cell(&self, pos: GridPos) -> Option<CellState> {
        self.size.index_of(pos).map(|idx| self.cells[idx])
    }

    pub fn class_at(&self, pos: GridPos) -> Option<CellClass> {
        self.cell(pos).map(|cell| cell.class)
    }

    pub fn is_roofed(&self, pos: GridPos) -> bool {
        self.cell(pos).is_some_and(|cell| cell.roofed)
    }

    pub fn elevation_at(&self, pos: GridPos) -> Option<f32> {
        self.class_at(pos).map(CellClass::elevation)
    }

    /// Row-major elevation grid ready to hand to a terrain pipeline.
    pub fn elevations(&self) -> Vec<f32> {
        self.cells.iter().map(|cell| cell.class.elevation()).collect()
    }

    /// Whether `pos` was carved by the inner clearing in this pass.
    pub fn is_inner_area(&self, pos: GridPos) -> bool {
        self.size
            .index_of(pos)
            .is_some_and(|idx| self.inner_area[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPos, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (self.size.pos_of(idx), *cell))
    }

    pub fn count(&self, class: CellClass) -> usize {
        self.cells.iter().filter(|cell| cell.class == class).count()
    }

    pub fn clearing(&self) -> Option<&ShapeRegion> {
        self.clearing.as_ref()
    }

    pub fn quarry(&self) -> Option<&ShapeRegion> {
        self.quarry.as_ref()
    }

    pub fn special_area(&self) -> Option<&ShapeRegion> {
        self.special_area.as_ref()
    }

    /// Suggested player start, present when the clearing hosts the start.
    pub fn start_spot(&self) -> Option<GridPos> {
        self.start_spot
    }

    /// Removes the roof from each corridor cell outside the inner clearing.
    /// Off-grid cells are ignored. Returns how many roofs were removed.
    pub fn strip_corridor_roofs<I>(&mut self, corridor: I) -> usize
    where
        I: IntoIterator<Item = GridPos>,
    {
        let mut stripped = 0;
        for pos in corridor {
            let Some(idx) = self.size.index_of(pos) else {
                continue;
            };
            if self.inner_area[idx] {
                continue;
            }
            let cell = &mut self.cells[idx];
            if cell.roofed {
                cell.roofed = false;
                stripped += 1;
            }
        }
        stripped
    }

    /// Stable FNV-1a digest over dimensions, classes, and roof flags.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FnvHasher::new();
        hasher.write(&self.size.width.to_le_bytes());
        hasher.write(&self.size.height.to_le_bytes());
        for cell in &self.cells {
            hasher.write(&[cell.class.tag(), cell.roofed as u8]);
        }
        hasher.finish()
    }

    /// One text row per z, `#` impenetrable, `^` rough, `.` normal, space cleared.
    pub fn to_ascii(&self) -> String {
        let w = self.size.width as usize;
        let mut out = String::with_capacity(self.cells.len() + self.size.height as usize);
        for row in self.cells.chunks(w) {
            out.extend(row.iter().map(|cell| cell.class.glyph()));
            out.push('\n');
        }
        out
    }
}

/// Regions placed before the cell pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlacedRegions {
    pub clearing: Option<ShapeRegion>,
    pub quarry: Option<ShapeRegion>,
    pub special_area: Option<ShapeRegion>,
}
