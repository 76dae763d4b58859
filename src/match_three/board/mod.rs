pub(crate) mod damage;
pub(crate) mod gravity;
pub(crate) mod indexing;
pub(crate) mod pretty;
pub(crate) mod tile;

pub use damage::HitOutcome;
pub use tile::{Cover, CoverKind, Ground, GroundKind, Tile};

use crate::utils::prelude::*;

use crate::match_three::consts::{TileKind, MAX_OBJECTIVES};
use crate::match_three::coords::Pos;
use crate::match_three::level::{LevelConfig, Objective};
use crate::match_three::rng::DeterministicRng;

/// The full simulation state: tiles, overlay layers, score, objectives and
/// the RNG stream. Owned exclusively; every system borrows it mutably for the
/// duration of one call and retains nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    width: usize,
    height: usize,
    pub tile_type_count: usize,

    /// Row-major slots, `idx = y * width + x`. Sized once at construction.
    grid: Vec<Tile>,
    grounds: Vec<Ground>,
    covers: Vec<Cover>,

    pub score: i64,
    pub tick: u64,
    pub sim_time: f32,
    pub move_limit: u16,
    pub moves_used: u16,
    pub objectives: [Objective; MAX_OBJECTIVES],
    pub random: DeterministicRng,

    next_tile_id: u32,
}

impl GameState {
    /// Builds a state from a level config. Pre-placed tiles get fresh ids and
    /// settled visuals; empty cells stay empty until the first refill pass.
    pub fn new(level: &LevelConfig, seed: u64) -> Result<GameState> {
        level.validate()?;

        let mut state = GameState {
            width: level.width,
            height: level.height,
            tile_type_count: level.tile_type_count,
            grid: vec![Tile::empty(); level.width * level.height],
            grounds: vec![Ground::none(); level.width * level.height],
            covers: vec![Cover::none(); level.width * level.height],
            score: 0,
            tick: 0,
            sim_time: 0.0,
            move_limit: level.move_limit,
            moves_used: 0,
            objectives: level.objectives,
            random: DeterministicRng::new(seed),
            next_tile_id: 1,
        };

        for y in 0..level.height {
            for x in 0..level.width {
                let spec = level.cell(x, y);
                let idx = y * level.width + x;

                if spec.kind != TileKind::None {
                    let id = state.fresh_tile_id();
                    state.grid[idx] = Tile {
                        id,
                        kind: spec.kind,
                        bomb: spec.bomb,
                        visual: (x as f32, y as f32),
                        ..Tile::empty()
                    };
                }
                state.grounds[idx] = Ground { kind: spec.ground, hp: spec.ground_hp };
                state.covers[idx] = Cover { kind: spec.cover, hp: spec.cover_hp };
            }
        }

        Ok(state)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Hands out the next stable tile id.
    pub(crate) fn fresh_tile_id(&mut self) -> u32 {
        let id = self.next_tile_id;
        self.next_tile_id += 1;
        id
    }

    /// The active spawnable palette.
    pub fn palette(&self) -> &'static [TileKind] {
        &crate::match_three::consts::PALETTE[..self.tile_type_count]
    }

    /// The most frequent ordinary colour on the board, ties broken by palette
    /// enumeration order. None on a colourless board.
    pub fn most_populous_colour(&self) -> Option<TileKind> {
        let mut counts = [0usize; crate::match_three::consts::REGULAR_COLOURS];
        for tile in &self.grid {
            if tile.kind.is_regular() && !tile.suspended {
                counts[tile.kind as usize - 1] += 1;
            }
        }
        // max_by_key takes the last maximum, so scan in reverse palette order
        // to make the first palette entry win ties.
        (0..counts.len())
            .rev()
            .max_by_key(|&i| counts[i])
            .filter(|&i| counts[i] > 0)
            .map(|i| TileKind::from(i as u8 + 1))
    }

    /// Whether all active objectives are satisfied.
    pub fn objectives_complete(&self) -> bool {
        self.objectives.iter().all(|o| o.is_satisfied())
    }

    /// Whether any tile is mid-fall.
    pub fn any_falling(&self) -> bool {
        self.grid.iter().any(|t| t.falling)
    }

    /// Whether any slot is reserved by an explosion.
    pub fn any_suspended(&self) -> bool {
        self.grid.iter().any(|t| t.suspended)
    }

    /// Whether the cell may participate in a match right now: a regular
    /// colour, settled, not reserved, and not caged.
    pub fn cell_matchable(&self, pos: &Pos) -> bool {
        let Some(tile) = self.tile(pos) else {
            return false;
        };
        if !tile.kind.is_regular() || tile.suspended || tile.falling {
            return false;
        }
        !self.cover_at(pos).map_or(false, |c| !c.is_none() && c.kind.blocks_matching())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_three::consts::BombKind;
    use crate::match_three::level::CellSpec;

    fn small_level() -> LevelConfig {
        let mut level = LevelConfig::blank(3, 2);
        *level.cell_mut(0, 0) = CellSpec { kind: TileKind::Red, ..CellSpec::default() };
        *level.cell_mut(1, 0) = CellSpec { kind: TileKind::Red, ..CellSpec::default() };
        *level.cell_mut(2, 0) = CellSpec { kind: TileKind::Blue, ..CellSpec::default() };
        *level.cell_mut(0, 1) = CellSpec {
            kind: TileKind::Green,
            bomb: BombKind::Ufo,
            ..CellSpec::default()
        };
        level
    }

    #[test]
    fn construction_assigns_unique_ids() {
        let state = GameState::new(&small_level(), 1).unwrap();
        let mut ids: Vec<u32> =
            state.tiles().filter(|t| !t.is_empty()).map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn most_populous_colour_prefers_palette_order_on_ties() {
        let state = GameState::new(&small_level(), 1).unwrap();
        // Red x2 beats everything.
        assert_eq!(state.most_populous_colour(), Some(TileKind::Red));

        let mut level = LevelConfig::blank(2, 1);
        *level.cell_mut(0, 0) = CellSpec { kind: TileKind::Blue, ..CellSpec::default() };
        *level.cell_mut(1, 0) = CellSpec { kind: TileKind::Green, ..CellSpec::default() };
        let state = GameState::new(&level, 1).unwrap();
        // Tie: Green precedes Blue in the palette.
        assert_eq!(state.most_populous_colour(), Some(TileKind::Green));
    }
}
