use crate::match_three::board::GameState;
use crate::match_three::consts::TileKind;
use crate::match_three::coords::Pos;
use crate::match_three::sets::{PosSet, SetOps};

/// A maximal straight segment of at least three same-coloured cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub start: Pos,
    pub len: usize,
    pub horizontal: bool,
}

impl Run {
    /// The cells covered by the run, in axis order.
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.len as i32).map(move |i| {
            if self.horizontal {
                Pos::new(self.start.x + i, self.start.y)
            } else {
                Pos::new(self.start.x, self.start.y + i)
            }
        })
    }

    pub fn contains(&self, pos: &Pos) -> bool {
        if self.horizontal {
            pos.y == self.start.y
                && pos.x >= self.start.x
                && pos.x < self.start.x + self.len as i32
        } else {
            pos.x == self.start.x
                && pos.y >= self.start.y
                && pos.y < self.start.y + self.len as i32
        }
    }

    /// The last cell of the run.
    pub fn end(&self) -> Pos {
        if self.horizontal {
            Pos::new(self.start.x + self.len as i32 - 1, self.start.y)
        } else {
            Pos::new(self.start.x, self.start.y + self.len as i32 - 1)
        }
    }
}

/// Splits the matchable cells of the board into 4-connected same-colour
/// components, in row-major order of each component's first cell.
pub fn components(state: &GameState) -> Vec<(TileKind, PosSet)> {
    let mut seen = PosSet::new();
    let mut out = Vec::new();

    for pos in state.positions() {
        if seen.contains(&pos) || !state.cell_matchable(&pos) {
            continue;
        }
        let kind = state.tile(&pos).expect("matchable cell").kind;

        let mut component = PosSet::new();
        let mut frontier = vec![pos];
        while let Some(p) = frontier.pop() {
            if component.contains(&p) {
                continue;
            }
            component.insert(&p);
            seen.insert(&p);
            for n in p.neighbours() {
                if !component.contains(&n)
                    && state.cell_matchable(&n)
                    && state.tile(&n).map_or(false, |t| t.kind == kind)
                {
                    frontier.push(n);
                }
            }
        }
        out.push((kind, component));
    }
    out
}

/// Finds all maximal horizontal and vertical runs of length >= 3 inside the
/// given cell set.
pub fn runs_in(cells: &PosSet) -> (Vec<Run>, Vec<Run>) {
    let mut hruns = Vec::new();
    let mut vruns = Vec::new();

    for p in cells.iter() {
        // A run starts where the predecessor along its axis is absent.
        if !cells.contains(&Pos::new(p.x - 1, p.y)) {
            let mut len = 1;
            while cells.contains(&Pos::new(p.x + len, p.y)) {
                len += 1;
            }
            if len >= 3 {
                hruns.push(Run { start: p, len: len as usize, horizontal: true });
            }
        }
        if !cells.contains(&Pos::new(p.x, p.y - 1)) {
            let mut len = 1;
            while cells.contains(&Pos::new(p.x, p.y + len)) {
                len += 1;
            }
            if len >= 3 {
                vruns.push(Run { start: p, len: len as usize, horizontal: false });
            }
        }
    }

    (hruns, vruns)
}

/// Axis-aligned bounding box of a non-empty cell set: (min, max) inclusive.
pub fn bounding_box(cells: &PosSet) -> (Pos, Pos) {
    assert!(!cells.is_empty(), "bounding box of an empty component");
    let mut min = Pos::new(i32::MAX, i32::MAX);
    let mut max = Pos::new(i32::MIN, i32::MIN);
    for p in cells.iter() {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

/// Splits a cell set into its 4-connected pieces, ordered by first cell.
pub fn connected_pieces(cells: &PosSet) -> Vec<PosSet> {
    let mut seen = PosSet::new();
    let mut pieces = Vec::new();

    for start in cells.iter() {
        if seen.contains(&start) {
            continue;
        }
        let mut piece = PosSet::new();
        let mut frontier = vec![start];
        while let Some(p) = frontier.pop() {
            if piece.contains(&p) {
                continue;
            }
            piece.insert(&p);
            seen.insert(&p);
            for n in p.neighbours() {
                if cells.contains(&n) && !piece.contains(&n) {
                    frontier.push(n);
                }
            }
        }
        pieces.push(piece);
    }
    pieces
}
