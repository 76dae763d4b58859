use crate::match_three::board::GameState;
use crate::match_three::consts::BombKind;
use crate::match_three::coords::Pos;
use crate::match_three::sets::{PosSet, SetOps};

/// Enumerates the cells a bomb reaches when it fires at `origin`, clipped to
/// the board. The origin cell is always included so the carrier clears with
/// its own blast. Stochastic pieces (the Ufo's extra target) draw from the
/// state RNG, so call order matters for determinism.
pub fn affected_cells(state: &mut GameState, kind: BombKind, origin: &Pos) -> PosSet {
    let mut cells = PosSet::new();

    match kind {
        BombKind::None => {}
        BombKind::HorizontalRocket => {
            for x in 0..state.width() as i32 {
                cells.insert(&Pos::new(x, origin.y));
            }
        }
        BombKind::VerticalRocket => {
            for y in 0..state.height() as i32 {
                cells.insert(&Pos::new(origin.x, y));
            }
        }
        BombKind::AreaBomb => {
            insert_block(state, &mut cells, origin, 2);
        }
        BombKind::Ufo => {
            insert_small_cross(state, &mut cells, origin);
            if let Some(extra) = random_target(state, &cells) {
                cells.insert(&extra);
            }
        }
        BombKind::ColorBomb => {
            cells.insert(origin);
            if let Some(colour) = state.most_populous_colour() {
                for pos in state.positions() {
                    let tile = state.tile(&pos).expect("in-bounds");
                    if tile.kind == colour && !tile.suspended {
                        cells.insert(&pos);
                    }
                }
            }
        }
    }

    if kind != BombKind::None {
        cells.insert(origin);
    }
    cells
}

/// A square block of Chebyshev radius `r` around the origin, clipped.
pub(crate) fn insert_block(state: &GameState, cells: &mut PosSet, origin: &Pos, r: i32) {
    for dy in -r..=r {
        for dx in -r..=r {
            let p = Pos::new(origin.x + dx, origin.y + dy);
            if state.in_bounds(&p) {
                cells.insert(&p);
            }
        }
    }
}

/// The Ufo's 4-neighbour cross, clipped.
pub(crate) fn insert_small_cross(state: &GameState, cells: &mut PosSet, origin: &Pos) {
    if state.in_bounds(origin) {
        cells.insert(origin);
    }
    for n in origin.neighbours() {
        if state.in_bounds(&n) {
            cells.insert(&n);
        }
    }
}

/// One uniform draw over the non-empty, non-suspended cells outside the
/// already-covered set. None when the rest of the board is bare.
pub(crate) fn random_target(state: &mut GameState, covered: &PosSet) -> Option<Pos> {
    let eligible: Vec<Pos> = state
        .positions()
        .filter(|p| {
            let tile = state.tile(p).expect("in-bounds");
            !tile.is_empty() && !tile.suspended && !covered.contains(p)
        })
        .collect();

    if eligible.is_empty() {
        return None;
    }
    let pick = state.random.next_below(eligible.len() as i32) as usize;
    Some(eligible[pick])
}
