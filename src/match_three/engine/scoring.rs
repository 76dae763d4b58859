use crate::match_three::consts::{BombKind, TileKind};
use crate::match_three::detector::MatchGroup;
use crate::match_three::sets::SetOps;

/// Scoring is a collaborator, not core logic: the engine asks it for deltas
/// and records the answers. Injected so analyzers can weigh boards
/// differently without touching the simulation.
pub trait ScoreSystem {
    /// Points for clearing one match group.
    fn match_score(&self, group: &MatchGroup) -> i32;

    /// Bonus for a special swap (combo or single activation).
    fn special_move_score(
        &self,
        a_kind: TileKind,
        a_bomb: BombKind,
        b_kind: TileKind,
        b_bomb: BombKind,
    ) -> i32;
}

/// Default tuning: a flat per-tile rate, a premium on bomb-spawning matches,
/// and pair bonuses scaled by the stronger bomb.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardScoring;

const TILE_SCORE: i32 = 10;

fn bomb_bonus(bomb: BombKind) -> i32 {
    match bomb {
        BombKind::None => 0,
        BombKind::HorizontalRocket | BombKind::VerticalRocket => 50,
        BombKind::Ufo => 40,
        BombKind::AreaBomb => 80,
        BombKind::ColorBomb => 150,
    }
}

impl ScoreSystem for StandardScoring {
    fn match_score(&self, group: &MatchGroup) -> i32 {
        group.cells.len() as i32 * TILE_SCORE + bomb_bonus(group.spawn_bomb)
    }

    fn special_move_score(
        &self,
        a_kind: TileKind,
        a_bomb: BombKind,
        b_kind: TileKind,
        b_bomb: BombKind,
    ) -> i32 {
        let pair = bomb_bonus(a_bomb) + bomb_bonus(b_bomb);
        // A rainbow dragged onto a plain colour scores as a colour sweep.
        let rainbow_drag = (a_kind == TileKind::Rainbow) ^ (b_kind == TileKind::Rainbow);
        if pair > 0 && rainbow_drag {
            pair + 100
        } else if pair > 0 {
            pair * 2
        } else {
            0
        }
    }
}
