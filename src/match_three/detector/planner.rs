use primitive_types::U256;

use super::runs;
use super::shapes::DetectedShape;
use super::MatchGroup;
use crate::match_three::consts::TileKind;
use crate::match_three::coords::Pos;
use crate::match_three::sets::{PosSet, SetOps};

/// Candidate ceiling for the exact search; covers the 8x8 solid-block stress
/// case (160 candidates). Beyond it the deterministic greedy takes over.
const MAX_EXACT_CANDIDATES: usize = 160;

/// Node budget for the exact search. Blowing it aborts to greedy, keeping
/// worst-case planning time bounded regardless of candidate geometry.
const EXACT_NODE_BUDGET: u64 = 200_000;

/// Selects the highest-weighted pairwise-disjoint subset of candidates, then
/// sweeps the residue of the component into simple groups. Output order is
/// canonical: selected shapes first (weight desc, kind priority, anchor),
/// then residual groups by first cell.
pub fn plan(kind: TileKind, component: &PosSet, mut candidates: Vec<DetectedShape>) -> Vec<MatchGroup> {
    canonical_sort(&mut candidates);

    let selected = select(component, &candidates);

    let mut groups: Vec<MatchGroup> = Vec::with_capacity(selected.len() + 1);
    let mut residual = component.clone();
    for &i in &selected {
        residual.difference_inplace(&candidates[i].cells);
    }

    for &i in &selected {
        let shape = &candidates[i];
        let mut cells = shape.cells.clone();

        // Straight-line groups soak up collinear scraps that extend them;
        // perpendicular scraps stay behind.
        if let Some(horizontal) = shape.line_axis() {
            absorb_collinear(&mut cells, &mut residual, horizontal);
        }

        groups.push(MatchGroup { kind, cells, spawn_bomb: shape.kind, bomb_origin: None });
    }

    // Whatever is left only clears if it still lines up three in a row.
    let (hruns, vruns) = runs::runs_in(&residual);
    let mut run_cells = PosSet::new();
    for run in hruns.iter().chain(vruns.iter()) {
        run_cells.union_inplace(&run.cells().collect());
    }
    for piece in runs::connected_pieces(&run_cells) {
        groups.push(MatchGroup::simple(kind, piece));
    }

    groups
}

/// Deterministic candidate order: weight desc, kind priority desc, anchor,
/// then cell set as a final disambiguator.
fn canonical_sort(candidates: &mut [DetectedShape]) {
    candidates.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then(b.kind.priority().cmp(&a.kind.priority()))
            .then(a.anchor.cmp(&b.anchor))
            .then(a.cells.as_slice().cmp(b.cells.as_slice()))
    });
}

/// Picks the winning subset, exact when the component is small enough to
/// afford it, greedy otherwise. Returns indices into the canonical order,
/// ascending.
fn select(component: &PosSet, candidates: &[DetectedShape]) -> Vec<usize> {
    if candidates.is_empty() {
        return Vec::new();
    }

    if candidates.len() <= MAX_EXACT_CANDIDATES {
        if let Some(masks) = cell_masks(component, candidates) {
            if let Some(best) = exact_search(candidates, &masks) {
                return best;
            }
            return greedy_masked(candidates, &masks);
        }
    }

    greedy(candidates)
}

/// Maps every candidate to a bitmask over the component bounding box, if the
/// box fits in 256 bits.
fn cell_masks(component: &PosSet, candidates: &[DetectedShape]) -> Option<Vec<U256>> {
    let (min, max) = runs::bounding_box(component);
    let w = (max.x - min.x + 1) as usize;
    let h = (max.y - min.y + 1) as usize;
    if w * h > 256 {
        return None;
    }

    let mask_of = |cells: &PosSet| {
        let mut mask = U256::zero();
        for c in cells.iter() {
            let bit = (c.y - min.y) as usize * w + (c.x - min.x) as usize;
            mask = mask | (U256::one() << bit);
        }
        mask
    };

    Some(candidates.iter().map(|s| mask_of(&s.cells)).collect())
}

/// Branch-and-bound weighted-independent-set over the canonical order.
/// Take-first exploration plus strict improvement means ties resolve to the
/// canonically earliest selection. None when the node budget blows.
fn exact_search(candidates: &[DetectedShape], masks: &[U256]) -> Option<Vec<usize>> {
    let n = candidates.len();
    let mut suffix = vec![0u64; n + 1];
    for i in (0..n).rev() {
        suffix[i] = suffix[i + 1] + candidates[i].weight as u64;
    }

    struct Search<'a> {
        masks: &'a [U256],
        weights: Vec<u64>,
        suffix: Vec<u64>,
        best_weight: u64,
        best: Vec<usize>,
        current: Vec<usize>,
        nodes: u64,
    }

    impl Search<'_> {
        /// Returns false when the node budget is exhausted.
        fn dfs(&mut self, i: usize, used: U256, weight: u64) -> bool {
            self.nodes += 1;
            if self.nodes > EXACT_NODE_BUDGET {
                return false;
            }

            if weight + self.suffix[i] <= self.best_weight {
                return true;
            }
            if i == self.masks.len() {
                if weight > self.best_weight {
                    self.best_weight = weight;
                    self.best = self.current.clone();
                }
                return true;
            }

            if (self.masks[i] & used).is_zero() {
                self.current.push(i);
                if !self.dfs(i + 1, used | self.masks[i], weight + self.weights[i]) {
                    return false;
                }
                self.current.pop();
            }
            self.dfs(i + 1, used, weight)
        }
    }

    let mut search = Search {
        masks,
        weights: candidates.iter().map(|s| s.weight as u64).collect(),
        suffix,
        best_weight: 0,
        best: Vec::new(),
        current: Vec::new(),
        nodes: 0,
    };

    search.dfs(0, U256::zero(), 0).then(|| search.best)
}

/// Greedy fallback over bitmasks.
fn greedy_masked(candidates: &[DetectedShape], masks: &[U256]) -> Vec<usize> {
    let mut used = U256::zero();
    let mut chosen = Vec::new();
    for (i, mask) in masks.iter().enumerate() {
        if (*mask & used).is_zero() {
            used = used | *mask;
            chosen.push(i);
        }
    }
    chosen
}

/// Greedy fallback over position sets, for components too wide for masks.
fn greedy(candidates: &[DetectedShape]) -> Vec<usize> {
    let mut used = PosSet::new();
    let mut chosen = Vec::new();
    for (i, shape) in candidates.iter().enumerate() {
        if !shape.cells.intersects(&used) {
            used.union_inplace(&shape.cells);
            chosen.push(i);
        }
    }
    chosen
}

/// Moves residual cells that continuously extend a straight line into it.
fn absorb_collinear(cells: &mut PosSet, residual: &mut PosSet, horizontal: bool) {
    let grow = |cells: &mut PosSet, residual: &mut PosSet, step: i32| {
        loop {
            let edge = if step < 0 {
                cells.first().expect("line group has cells")
            } else {
                cells.nth(cells.len() - 1).expect("line group has cells")
            };
            let next = if horizontal {
                Pos::new(edge.x + step, edge.y)
            } else {
                Pos::new(edge.x, edge.y + step)
            };
            if residual.contains(&next) {
                residual.remove(&next);
                cells.insert(&next);
            } else {
                break;
            }
        }
    };

    grow(cells, residual, -1);
    grow(cells, residual, 1);
}
