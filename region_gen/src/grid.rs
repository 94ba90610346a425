use serde::Serialize;

use crate::error::ComposeError;

/// Dimensions of the cell grid being composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    /// Rejects empty grids and extents that do not fit an `i32` coordinate.
    pub fn new(width: u32, height: u32) -> Result<Self, ComposeError> {
        let max = i32::MAX as u32;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(ComposeError::InvalidGrid { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    #[inline]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.z >= 0 && (pos.x as u32) < self.width && (pos.z as u32) < self.height
    }

    /// Row-major index of `pos`, or `None` when it falls outside the grid.
    #[inline]
    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some(pos.z as usize * self.width as usize + pos.x as usize)
    }

    #[inline]
    pub fn pos_of(&self, idx: usize) -> GridPos {
        let w = self.width as usize;
        GridPos::new((idx % w) as i32, (idx / w) as i32)
    }

    /// True when `pos` lies within `depth` cells of any grid edge.
    pub fn within_edge_band(&self, pos: GridPos, depth: i32) -> bool {
        if depth <= 0 {
            return false;
        }
        let w = self.width as i32;
        let h = self.height as i32;
        pos.x < depth || pos.z < depth || pos.x >= w - depth || pos.z >= h - depth
    }

    /// True when `pos` sits in one of the four `margin`×`margin` corner boxes.
    pub fn within_corner_box(&self, pos: GridPos, margin: i32) -> bool {
        if margin <= 0 {
            return false;
        }
        let w = self.width as i32;
        let h = self.height as i32;
        let near_x = pos.x < margin || pos.x >= w - margin;
        let near_z = pos.z < margin || pos.z >= h - margin;
        near_x && near_z
    }

    /// Iterates every position in row-major order (z outer, x inner).
    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        let w = self.width as i32;
        let h = self.height as i32;
        (0..h).flat_map(move |z| (0..w).map(move |x| GridPos::new(x, z)))
    }
}

/// Integer cell coordinate. Signed so placement math may step off-grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridPos {
    pub x: i32,
    pub z: i32,
}

impl GridPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_sq(&self, other: GridPos) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dz * dz
    }
}
