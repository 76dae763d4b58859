use super::effects;
use crate::match_three::board::GameState;
use crate::match_three::consts::{BombKind, TileKind};
use crate::match_three::coords::Pos;
use crate::match_three::sets::{PosSet, SetOps};

/// What a special swap resolves to: one targeted blast plus any bombs that
/// were stamped onto the board and still have to fire on their own.
#[derive(Clone, Debug, Default)]
pub struct ComboResult {
    /// Cells for one targeted explosion centred on the swap target.
    pub cells: PosSet,
    /// Positions converted into live bombs, to be activated in order.
    pub triggered: Vec<Pos>,
}

/// Resolves a swap that involves at least one special piece. Consumes both
/// carriers' bomb properties up front so they cannot re-trigger when the
/// blast later sweeps over them. `from`/`to` are the swap foci; `to` is the
/// combo centre.
pub fn combo_result(state: &mut GameState, from: &Pos, to: &Pos) -> ComboResult {
    let a = effective_bomb(state, from);
    let b = effective_bomb(state, to);
    debug_assert!(
        a != BombKind::None || b != BombKind::None,
        "combo over two plain tiles"
    );

    if let Some(tile) = state.tile_mut(from) {
        tile.bomb = BombKind::None;
    }
    if let Some(tile) = state.tile_mut(to) {
        tile.bomb = BombKind::None;
    }

    // Normalize so the lower-numbered kind leads; the pair table below is
    // symmetric, positions travel with their bombs.
    let (a, pa, b, pb) =
        if a as u8 <= b as u8 { (a, *from, b, *to) } else { (b, *to, a, *from) };

    let mut result = ComboResult::default();
    let centre = *to;

    match (a, b) {
        (BombKind::None, BombKind::None) => {}

        // A colour bomb dragged onto a plain tile eats that specific colour.
        (BombKind::None, BombKind::ColorBomb) => {
            let plain = if b == BombKind::ColorBomb { pa } else { pb };
            let colour = state.tile(&plain).map(|t| t.kind).unwrap_or(TileKind::None);
            result.cells.insert(from).insert(to);
            if colour.is_regular() {
                collect_colour(state, colour, &mut result.cells);
            }
        }

        // Any other single special piece just fires in place.
        (BombKind::None, other) => {
            result.cells = effects::affected_cells(state, other, &pb);
        }

        (BombKind::HorizontalRocket | BombKind::VerticalRocket, BombKind::HorizontalRocket | BombKind::VerticalRocket) => {
            insert_row(state, &mut result.cells, centre.y);
            insert_column(state, &mut result.cells, centre.x);
        }

        (BombKind::HorizontalRocket | BombKind::VerticalRocket, BombKind::AreaBomb) => {
            for lane in -1..=1 {
                insert_row(state, &mut result.cells, centre.y + lane);
                insert_column(state, &mut result.cells, centre.x + lane);
            }
        }

        (rocket @ (BombKind::HorizontalRocket | BombKind::VerticalRocket), BombKind::Ufo) => {
            effects::insert_small_cross(state, &mut result.cells, &centre);
            if rocket == BombKind::HorizontalRocket {
                insert_row(state, &mut result.cells, centre.y);
            } else {
                insert_column(state, &mut result.cells, centre.x);
            }
        }

        (rocket @ (BombKind::HorizontalRocket | BombKind::VerticalRocket), BombKind::ColorBomb) => {
            convert_populous(state, rocket, &mut result);
        }

        (BombKind::AreaBomb, BombKind::AreaBomb) => {
            effects::insert_block(state, &mut result.cells, &centre, 4);
        }

        (BombKind::AreaBomb, BombKind::Ufo) => {
            effects::insert_small_cross(state, &mut result.cells, &centre);
            effects::insert_block(state, &mut result.cells, &centre, 2);
        }

        (BombKind::AreaBomb, BombKind::ColorBomb) => {
            convert_populous(state, BombKind::AreaBomb, &mut result);
        }

        (BombKind::Ufo, BombKind::Ufo) => {
            effects::insert_small_cross(state, &mut result.cells, &pa);
            effects::insert_small_cross(state, &mut result.cells, &pb);
            for _ in 0..3 {
                if let Some(shot) = effects::random_target(state, &result.cells) {
                    result.cells.insert(&shot);
                }
            }
        }

        (BombKind::ColorBomb, BombKind::Ufo) => {
            convert_populous(state, BombKind::Ufo, &mut result);
        }

        (BombKind::ColorBomb, BombKind::ColorBomb) => {
            for pos in state.positions() {
                result.cells.insert(&pos);
            }
        }

        // The pair is normalized by kind; inverted orders cannot occur.
        _ => unreachable!("non-normalized combo pair {a:?}/{b:?}"),
    }

    // The carrier cells clear with the blast regardless of its shape.
    if a != BombKind::None || b != BombKind::None {
        result.cells.insert(from).insert(to);
    }
    result
}

/// A tile's combo contribution: its decoration, or an implied colour bomb
/// for a bare rainbow carrier.
fn effective_bomb(state: &GameState, pos: &Pos) -> BombKind {
    state.tile(pos).map_or(BombKind::None, |t| {
        if t.bomb == BombKind::None && t.kind == TileKind::Rainbow {
            BombKind::ColorBomb
        } else {
            t.bomb
        }
    })
}

fn insert_row(state: &GameState, cells: &mut PosSet, y: i32) {
    for x in 0..state.width() as i32 {
        let p = Pos::new(x, y);
        if state.in_bounds(&p) {
            cells.insert(&p);
        }
    }
}

fn insert_column(state: &GameState, cells: &mut PosSet, x: i32) {
    for y in 0..state.height() as i32 {
        let p = Pos::new(x, y);
        if state.in_bounds(&p) {
            cells.insert(&p);
        }
    }
}

fn collect_colour(state: &GameState, colour: TileKind, cells: &mut PosSet) {
    for pos in state.positions() {
        let tile = state.tile(&pos).expect("in-bounds");
        if tile.kind == colour && !tile.suspended {
            cells.insert(&pos);
        }
    }
}

/// Stamps `kind` onto every tile of the board's most populous colour; the
/// engine fires them one by one, in row-major order.
fn convert_populous(state: &mut GameState, kind: BombKind, result: &mut ComboResult) {
    let Some(colour) = state.most_populous_colour() else {
        return;
    };
    let targets: Vec<Pos> = state
        .positions()
        .filter(|p| {
            let tile = state.tile(p).expect("in-bounds");
            tile.kind == colour && !tile.suspended
        })
        .collect();

    for pos in &targets {
        state.tile_mut(pos).expect("in-bounds").bomb = kind;
    }
    result.triggered.extend(targets);
}
