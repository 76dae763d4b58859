use crate::match_three::board::{GameState, HitOutcome};
use crate::match_three::consts::{BombKind, TileKind};
use crate::match_three::coords::Pos;
use crate::match_three::detector::MatchGroup;
use crate::match_three::sets::{PosSet, SetOps};

use super::ScoreSystem;

/// What clearing a batch of match groups did to the board.
#[derive(Clone, Debug, Default)]
pub struct ProcessReport {
    pub resolved: Vec<(Pos, HitOutcome)>,
    /// Bombs that sat in the cleared area: queued for activation instead of
    /// being destroyed.
    pub triggered: Vec<Pos>,
    /// Bombs written onto the board at group origins.
    pub spawned: Vec<(Pos, BombKind)>,
    pub score_delta: i32,
}

/// Clears every group's cells except the protected origins, stamps the
/// spawned bombs, and queues any swept live bombs for activation. Groups
/// resolve in order; cells within a group in set order.
pub fn process(
    state: &mut GameState,
    groups: &[MatchGroup],
    scoring: &dyn ScoreSystem,
) -> ProcessReport {
    let mut report = ProcessReport::default();

    let protected: PosSet =
        groups.iter().filter_map(|g| g.bomb_origin).collect();

    for group in groups {
        for pos in group.cells.iter() {
            if protected.contains(&pos) {
                continue;
            }
            let tile = state.tile(&pos).expect("group cell in bounds");
            if tile.has_bomb() {
                report.triggered.push(pos);
                continue;
            }
            let outcome = state.hit_cell(&pos);
            if outcome != HitOutcome::Nothing {
                report.resolved.push((pos, outcome));
            }
        }

        report.score_delta += scoring.match_score(group);
    }

    for group in groups {
        let (Some(origin), bomb) = (group.bomb_origin, group.spawn_bomb) else {
            continue;
        };
        if bomb == BombKind::None {
            continue;
        }
        let tile = state.tile_mut(&origin).expect("origin in bounds");
        tile.bomb = bomb;
        if bomb == BombKind::ColorBomb {
            tile.kind = TileKind::Rainbow;
        }
        report.spawned.push((origin, bomb));
    }

    report
}
