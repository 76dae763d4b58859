use super::{CoverKind, GameState, GroundKind};
use crate::match_three::consts::{BombKind, TileKind};
use crate::match_three::coords::Pos;

/// What one hit on a cell did. The caller (match processor or explosion
/// scheduler) owns event emission and objective accounting; the state only
/// mutates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitOutcome {
    /// A cover soaked the hit; the tile is preserved.
    CoverHit { kind: CoverKind, destroyed: bool },
    /// The tile was cleared; carries what was destroyed and any ground
    /// damage dealt beneath it.
    TileCleared { kind: TileKind, bomb: BombKind, ground: Option<(GroundKind, u8)> },
    /// Nothing to hit (empty slot, possibly with an intact cover-free cell).
    Nothing,
}

impl GameState {
    /// Applies one hit to a cell: covers absorb first, then the tile is
    /// destroyed and the ground beneath takes one damage. Bombs are cleared
    /// here too; callers that must *trigger* a bomb instead of destroying it
    /// check for one before calling.
    pub(crate) fn hit_cell(&mut self, pos: &Pos) -> HitOutcome {
        if !self.in_bounds(pos) {
            return HitOutcome::Nothing;
        }

        let idx = self.idx(pos);

        let cover = self.covers[idx];
        if !cover.is_none() {
            let remaining = cover.hp - 1;
            self.covers[idx].hp = remaining;
            let destroyed = remaining == 0;
            if destroyed {
                self.covers[idx].kind = CoverKind::None;
            }
            return HitOutcome::CoverHit { kind: cover.kind, destroyed };
        }

        let tile = self.grid[idx];
        if tile.is_empty() {
            return HitOutcome::Nothing;
        }

        self.grid[idx].destroy();

        let ground = self.grounds[idx];
        let ground_damage = if !ground.is_none() {
            let remaining = ground.hp - 1;
            self.grounds[idx].hp = remaining;
            if remaining == 0 {
                self.grounds[idx].kind = GroundKind::None;
            }
            Some((ground.kind, remaining))
        } else {
            None
        };

        HitOutcome::TileCleared { kind: tile.kind, bomb: tile.bomb, ground: ground_damage }
    }

    /// Moves a dynamic cover along with its tile; static covers stay put.
    pub(crate) fn carry_dynamic_cover(&mut self, from: &Pos, to: &Pos) {
        let (fi, ti) = (self.idx(from), self.idx(to));
        if self.covers[fi].kind.is_dynamic() && !self.covers[fi].is_none() && self.covers[ti].is_none()
        {
            self.covers[ti] = self.covers[fi];
            self.covers[fi] = super::Cover::none();
        }
    }
}
