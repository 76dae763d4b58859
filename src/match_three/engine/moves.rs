use crate::match_three::board::GameState;
use crate::match_three::consts::TileKind;
use crate::match_three::coords::Pos;

/// Enumerates every swap that would commit: either endpoint is a special
/// piece, or the swapped board lines up three somewhere through the moved
/// tiles. Row-major over (right, down) neighbours, so the list is stable.
pub fn find_valid_swaps(state: &GameState) -> Vec<(Pos, Pos)> {
    let mut swaps = Vec::new();

    for from in state.positions() {
        for to in [Pos::new(from.x + 1, from.y), Pos::new(from.x, from.y + 1)] {
            if !state.in_bounds(&to) {
                continue;
            }
            if !swappable(state, &from) || !swappable(state, &to) {
                continue;
            }
            if is_special(state, &from) || is_special(state, &to) {
                swaps.push((from, to));
                continue;
            }
            if creates_run(state, &from, &to) {
                swaps.push((from, to));
            }
        }
    }

    swaps
}

fn swappable(state: &GameState, pos: &Pos) -> bool {
    state.tile(pos).map_or(false, |t| !t.is_empty() && !t.suspended && !t.falling)
}

fn is_special(state: &GameState, pos: &Pos) -> bool {
    state
        .tile(pos)
        .map_or(false, |t| t.has_bomb() || t.kind == TileKind::Rainbow)
}

/// The kind visible at `p` after swapping `from`/`to`, or None when the cell
/// cannot take part in a match.
fn swapped_kind(state: &GameState, p: &Pos, from: &Pos, to: &Pos) -> Option<TileKind> {
    if !state.in_bounds(p) {
        return None;
    }
    let source = if p == from {
        to
    } else if p == to {
        from
    } else {
        p
    };
    let tile = state.tile(source)?;
    if tile.is_empty() || tile.suspended || tile.falling || !tile.kind.is_regular() {
        return None;
    }
    // Matching is gated by the cover on the cell, not the tile.
    if state.cover_at(p).map_or(false, |c| !c.is_none() && c.kind.blocks_matching()) {
        return None;
    }
    Some(tile.kind)
}

/// Whether a run of three, or a 2x2 square, forms through either swapped
/// endpoint.
fn creates_run(state: &GameState, from: &Pos, to: &Pos) -> bool {
    [to, from].iter().any(|&focus| {
        let Some(kind) = swapped_kind(state, focus, from, to) else {
            return false;
        };

        let streak = |dx: i32, dy: i32| -> i32 {
            let mut n = 0;
            let mut p = Pos::new(focus.x + dx, focus.y + dy);
            while swapped_kind(state, &p, from, to) == Some(kind) {
                n += 1;
                p = Pos::new(p.x + dx, p.y + dy);
            }
            n
        };

        if 1 + streak(-1, 0) + streak(1, 0) >= 3 || 1 + streak(0, -1) + streak(0, 1) >= 3 {
            return true;
        }

        // A square counts too: check the four 2x2s that include the focus.
        [(-1, -1), (-1, 0), (0, -1), (0, 0)].iter().any(|&(ax, ay)| {
            (0..4).all(|i| {
                let corner = Pos::new(focus.x + ax + i % 2, focus.y + ay + i / 2);
                swapped_kind(state, &corner, from, to) == Some(kind)
            })
        })
    })
}
