//! World-map rules for tiles whose hilliness is impassable.
//!
//! The host normally refuses movement and settlement on these tiles; these
//! helpers turn them into very slow but usable tiles.

use std::fmt;

use crate::config::WorldTileConfig;

/// Path cost the host assigns to tiles it considers unreachable.
pub const IMPASSABLE_PATH_COST: i32 = 1_000_000;

pub type TileId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hilliness {
    Undefined,
    Flat,
    SmallHills,
    LargeHills,
    Mountainous,
    Impassable,
}

impl Hilliness {
    pub fn label(self) -> &'static str {
        match self {
            Hilliness::Undefined => "Undefined",
            Hilliness::Flat => "Flat",
            Hilliness::SmallHills => "Small hills",
            Hilliness::LargeHills => "Large hills",
            Hilliness::Mountainous => "Mountainous",
            Hilliness::Impassable => "Impassable",
        }
    }
}

/// The parts of a world tile the movement rules look at.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldTile {
    pub biome_label: String,
    pub biome_movement_difficulty: f32,
    pub biome_impassable: bool,
    pub hilliness: Hilliness,
}

impl WorldTile {
    pub fn is_impassable(&self) -> bool {
        self.biome_impassable || self.hilliness == Hilliness::Impassable
    }
}

impl WorldTileConfig {
    /// Replaces the host's hilliness offset for impassable tiles.
    pub fn hilliness_movement_offset(&self, hilliness: Hilliness, host_offset: f32) -> f32 {
        if hilliness == Hilliness::Impassable {
            self.movement_difficulty
        } else {
            host_offset
        }
    }

    /// Movement difficulty for an impassable tile, or `None` to let the host
    /// compute it. Appends one line per contributing term to `explanation`.
    pub fn movement_difficulty_at(
        &self,
        tile: &WorldTile,
        winter_offset: f32,
        explanation: Option<&mut String>,
    ) -> Option<f32> {
        if !tile.is_impassable() {
            return None;
        }
        if let Some(text) = explanation {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&format!(
                "{}: {}\n{}: {}",
                tile.biome_label,
                SignedDifficulty(tile.biome_movement_difficulty),
                tile.hilliness.label(),
                SignedDifficulty(self.movement_difficulty)
            ));
        }
        Some(tile.biome_movement_difficulty + self.movement_difficulty + winter_offset)
    }
}

/// Drops the host's "unreachable" cost by one on impassable tiles so the
/// pathfinder treats them as expensive rather than blocked.
pub fn adjust_path_cost(cost: i32, hilliness: Hilliness) -> i32 {
    if cost == IMPASSABLE_PATH_COST && hilliness == Hilliness::Impassable {
        cost - 1
    } else {
        cost
    }
}

struct SignedDifficulty(f32);

impl fmt::Display for SignedDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 10.0).round() / 10.0;
        write!(f, "{rounded:+}")
    }
}

/// Who owns a settlement standing on a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOwner {
    Unowned,
    Player,
    Faction(String),
}

/// Queries against the host's world objects.
pub trait WorldObjects {
    fn settlement_at(&self, tile: TileId) -> Option<SettlementOwner>;
    fn any_settlement_at_or_adjacent(&self, tile: TileId) -> bool;
    /// True when a map parent or a generated map already occupies `tile`.
    fn any_map_at(&self, tile: TileId) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementRejection {
    TileOccupied,
    YourBaseAlreadyThere,
    BaseAlreadyThere { faction: String },
    FactionBaseAdjacent,
}

impl fmt::Display for SettlementRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementRejection::TileOccupied => f.write_str("tile is occupied"),
            SettlementRejection::YourBaseAlreadyThere => {
                f.write_str("your base is already there")
            }
            SettlementRejection::BaseAlreadyThere { faction } => {
                write!(f, "{faction} already has a base there")
            }
            SettlementRejection::FactionBaseAdjacent => {
                f.write_str("a faction base is adjacent")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementVerdict {
    pub valid: bool,
    pub reasons: Vec<SettlementRejection>,
}

impl SettlementVerdict {
    fn from_host(valid: bool) -> Self {
        Self {
            valid,
            reasons: Vec::new(),
        }
    }
}

/// Re-checks a settlement site the host rejected. Impassable tiles are only
/// rejected for occupancy; everything else keeps the host's verdict.
pub fn revalidate_settlement_tile<W: WorldObjects + ?Sized>(
    host_valid: bool,
    tile: TileId,
    hilliness: Hilliness,
    world: &W,
) -> SettlementVerdict {
    if host_valid || hilliness != Hilliness::Impassable {
        return SettlementVerdict::from_host(host_valid);
    }

    let mut reasons = Vec::new();
    if let Some(owner) = world.settlement_at(tile) {
        reasons.push(match owner {
            SettlementOwner::Unowned => SettlementRejection::TileOccupied,
            SettlementOwner::Player => SettlementRejection::YourBaseAlreadyThere,
            SettlementOwner::Faction(faction) => SettlementRejection::BaseAlreadyThere { faction },
        });
    }
    if world.any_settlement_at_or_adjacent(tile) {
        reasons.push(SettlementRejection::FactionBaseAdjacent);
    }
    if world.any_map_at(tile) {
        reasons.push(SettlementRejection::TileOccupied);
    }

    SettlementVerdict {
        valid: reasons.is_empty(),
        reasons,
    }
}
