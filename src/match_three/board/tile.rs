use crate::utils::prelude::*;

use crate::match_three::consts::{BombKind, TileKind};

/// One grid slot. A slot always exists; `kind == None` means the slot holds
/// no tile. The flags live on the slot so that an empty cell can still be
/// reserved (`suspended`) by an explosion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    /// Stable for the lifetime of the tile; 0 for empty slots.
    pub id: u32,
    pub kind: TileKind,
    pub bomb: BombKind,
    /// Where the tile is drawn, in cell units. Equals the logical position
    /// whenever the tile is not falling.
    pub visual: (f32, f32),
    pub velocity: (f32, f32),
    pub falling: bool,
    /// Reserved by an active explosion; inert to matching, gravity, refill.
    pub suspended: bool,
    /// Set for exactly one tick after a fall completes.
    pub just_landed: bool,
}

impl Tile {
    pub fn empty() -> Tile {
        Tile {
            id: 0,
            kind: TileKind::None,
            bomb: BombKind::None,
            visual: (0.0, 0.0),
            velocity: (0.0, 0.0),
            falling: false,
            suspended: false,
            just_landed: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == TileKind::None
    }

    pub fn has_bomb(&self) -> bool {
        self.bomb != BombKind::None
    }

    /// Clears the slot back to empty, preserving the suspension flag (an
    /// explosion may still hold the cell).
    pub fn destroy(&mut self) {
        let suspended = self.suspended;
        *self = Tile::empty();
        self.suspended = suspended;
    }
}

/// Substrate layer under a cell; damaged when a tile is cleared on top.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroundKind {
    None = 0,
    Ice = 1,
}

impl GroundKind {
    pub fn notate(&self) -> char {
        match self {
            GroundKind::None => '.',
            GroundKind::Ice => 'i',
        }
    }

    pub fn parse(c: char) -> Result<GroundKind> {
        match c {
            '.' | '_' => Ok(GroundKind::None),
            'i' | 'I' => Ok(GroundKind::Ice),
            _ => Err(anyhow!("invalid notation {c} for GroundKind")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ground {
    pub kind: GroundKind,
    pub hp: u8,
}

impl Ground {
    pub fn none() -> Ground {
        Ground { kind: GroundKind::None, hp: 0 }
    }

    pub fn is_none(&self) -> bool {
        self.kind == GroundKind::None || self.hp == 0
    }
}

/// Cover layer over a cell. Cage blocks matching outright; Chain lets the
/// tile under it match but preserves the cell until the cover is destroyed;
/// Bubble is dynamic and follows its tile through gravity.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoverKind {
    None = 0,
    Cage = 1,
    Chain = 2,
    Bubble = 3,
}

impl CoverKind {
    /// Dynamic covers translate with the tile they cover; static covers pin
    /// it in place.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, CoverKind::Bubble)
    }

    /// Whether a tile under this cover may participate in a match.
    pub fn blocks_matching(&self) -> bool {
        matches!(self, CoverKind::Cage)
    }

    pub fn notate(&self) -> char {
        match self {
            CoverKind::None => '.',
            CoverKind::Cage => 'c',
            CoverKind::Chain => 'n',
            CoverKind::Bubble => 'b',
        }
    }

    pub fn parse(c: char) -> Result<CoverKind> {
        match c {
            '.' | '_' => Ok(CoverKind::None),
            'c' | 'C' => Ok(CoverKind::Cage),
            'n' | 'N' => Ok(CoverKind::Chain),
            'b' | 'B' => Ok(CoverKind::Bubble),
            _ => Err(anyhow!("invalid notation {c} for CoverKind")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cover {
    pub kind: CoverKind,
    pub hp: u8,
}

impl Cover {
    pub fn none() -> Cover {
        Cover { kind: CoverKind::None, hp: 0 }
    }

    pub fn is_none(&self) -> bool {
        self.kind == CoverKind::None || self.hp == 0
    }
}
