use serde::Serialize;

use crate::grid::GridPos;

/// Axis-aligned bounds shared by every region variant. Inclusive on the low
/// side; `high_*` is inclusive for rectangles and exclusive for circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub low_x: i32,
    pub high_x: i32,
    pub low_z: i32,
    pub high_z: i32,
}

/// Geometric membership predicate used for clearings and the quarry patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeRegion {
    Rectangle {
        low_x: i32,
        low_z: i32,
        high_x: i32,
        high_z: i32,
    },
    Circle {
        center_x: i32,
        center_z: i32,
        radius: i32,
    },
}

impl ShapeRegion {
    pub fn rectangle(low_x: i32, low_z: i32, high_x: i32, high_z: i32) -> Self {
        Self::Rectangle {
            low_x,
            low_z,
            high_x,
            high_z,
        }
    }

    pub fn circle(center: GridPos, radius: i32) -> Self {
        Self::Circle {
            center_x: center.x,
            center_z: center.z,
            radius,
        }
    }

    /// Membership test with the region shifted by `jitter` on both axes.
    ///
    /// Rectangles are inclusive on every bound; circles use a strict
    /// distance comparison.
    pub fn is_inside(&self, pos: GridPos, jitter: i32) -> bool {
        match *self {
            Self::Rectangle {
                low_x,
                low_z,
                high_x,
                high_z,
            } => {
                pos.x >= low_x + jitter
                    && pos.x <= high_x + jitter
                    && pos.z >= low_z + jitter
                    && pos.z <= high_z + jitter
            }
            Self::Circle {
                center_x,
                center_z,
                radius,
            } => {
                if radius <= 0 {
                    return false;
                }
                let center = GridPos::new(center_x + jitter, center_z + jitter);
                if pos.x < center.x - radius
                    || pos.x >= center.x + radius
                    || pos.z < center.z - radius
                    || pos.z >= center.z + radius
                {
                    return false;
                }
                let r = radius as i64;
                pos.distance_sq(center) < r * r
            }
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match *self {
            Self::Rectangle {
                low_x,
                low_z,
                high_x,
                high_z,
            } => BoundingBox {
                low_x,
                high_x,
                low_z,
                high_z,
            },
            Self::Circle {
                center_x,
                center_z,
                radius,
            } => BoundingBox {
                low_x: center_x - radius,
                high_x: center_x + radius,
                low_z: center_z - radius,
                high_z: center_z + radius,
            },
        }
    }

    pub fn center(&self) -> GridPos {
        match *self {
            Self::Rectangle {
                low_x,
                low_z,
                high_x,
                high_z,
            } => GridPos::new((low_x + high_x) / 2, (low_z + high_z) / 2),
            Self::Circle {
                center_x, center_z, ..
            } => GridPos::new(center_x, center_z),
        }
    }
}
