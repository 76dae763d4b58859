use crate::utils::prelude::*;

use crate::match_three::board::{CoverKind, GroundKind};
use crate::match_three::consts::{BombKind, TileKind, MAX_OBJECTIVES, REGULAR_COLOURS};

/// Initial contents of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSpec {
    pub kind: TileKind,
    pub bomb: BombKind,
    pub ground: GroundKind,
    pub ground_hp: u8,
    pub cover: CoverKind,
    pub cover_hp: u8,
}

impl Default for CellSpec {
    fn default() -> Self {
        CellSpec {
            kind: TileKind::None,
            bomb: BombKind::None,
            ground: GroundKind::None,
            ground_hp: 0,
            cover: CoverKind::None,
            cover_hp: 0,
        }
    }
}

/// Which layer an objective counts.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectiveLayer {
    Tile = 0,
    Cover = 1,
    Ground = 2,
}

impl ObjectiveLayer {
    pub fn parse(s: &str) -> Result<ObjectiveLayer> {
        match s {
            "tile" => Ok(ObjectiveLayer::Tile),
            "cover" => Ok(ObjectiveLayer::Cover),
            "ground" => Ok(ObjectiveLayer::Ground),
            _ => Err(anyhow!("invalid notation {s} for ObjectiveLayer")),
        }
    }

    pub fn notate(&self) -> &'static str {
        match self {
            ObjectiveLayer::Tile => "tile",
            ObjectiveLayer::Cover => "cover",
            ObjectiveLayer::Ground => "ground",
        }
    }
}

/// A level goal: destroy `target` elements of `element` on `layer`.
/// `target == 0` marks the slot inactive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Objective {
    pub layer: ObjectiveLayer,
    /// Layer-specific element discriminant (`TileKind`, `CoverKind` or
    /// `GroundKind` repr value).
    pub element: i32,
    pub target: u16,
    pub current: u16,
}

impl Objective {
    pub fn inactive() -> Objective {
        Objective { layer: ObjectiveLayer::Tile, element: 0, target: 0, current: 0 }
    }

    pub fn is_active(&self) -> bool {
        self.target > 0
    }

    pub fn is_satisfied(&self) -> bool {
        !self.is_active() || self.current >= self.target
    }
}

/// Everything needed to construct a playable board.
#[derive(Clone, Debug)]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    /// Active palette size; spawn colours are drawn from the first
    /// `tile_type_count` palette entries.
    pub tile_type_count: usize,
    pub cells: Vec<CellSpec>,
    pub move_limit: u16,
    pub objectives: [Objective; MAX_OBJECTIVES],
}

impl LevelConfig {
    /// An empty config of the given dimensions, to be filled cell by cell.
    pub fn blank(width: usize, height: usize) -> LevelConfig {
        LevelConfig {
            width,
            height,
            tile_type_count: REGULAR_COLOURS,
            cells: vec![CellSpec::default(); width * height],
            move_limit: u16::MAX,
            objectives: [Objective::inactive(); MAX_OBJECTIVES],
        }
    }

    /// Validates dimensional sanity before state construction.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(anyhow!("level dimensions must be positive"));
        }
        if self.cells.len() != self.width * self.height {
            return Err(anyhow!(
                "level cell table has {} entries, expected {}",
                self.cells.len(),
                self.width * self.height
            ));
        }
        if self.tile_type_count < 2 || self.tile_type_count > REGULAR_COLOURS {
            return Err(anyhow!(
                "tile_type_count {} outside supported range 2..={}",
                self.tile_type_count,
                REGULAR_COLOURS
            ));
        }
        Ok(())
    }

    pub fn cell(&self, x: usize, y: usize) -> &CellSpec {
        &self.cells[y * self.width + x]
    }

    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut CellSpec {
        &mut self.cells[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_levels_validate() {
        assert!(LevelConfig::blank(8, 8).validate().is_ok());
        assert!(LevelConfig::blank(0, 8).validate().is_err());
    }

    #[test]
    fn objective_activity() {
        let mut obj = Objective::inactive();
        assert!(!obj.is_active());
        assert!(obj.is_satisfied());

        obj.target = 3;
        assert!(obj.is_active());
        assert!(!obj.is_satisfied());
        obj.current = 3;
        assert!(obj.is_satisfied());
    }
}
