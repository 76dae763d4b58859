pub(crate) mod finder;
pub(crate) mod planner;
pub(crate) mod runs;
pub(crate) mod shapes;

pub use finder::{assign_origins, find_matches, find_matches_into};
pub use planner::plan;
pub use runs::{components, runs_in, Run};
pub use shapes::{detect, DetectedShape, ShapeClass};

use crate::match_three::consts::{BombKind, TileKind};
use crate::match_three::coords::Pos;
use crate::match_three::sets::PosSet;

/// One resolved match: the cells to clear, the bomb the match earns, and the
/// cell that keeps it. `bomb_origin` is assigned late (it depends on the swap
/// foci and the RNG) and names the one cell exempt from clearing.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchGroup {
    pub kind: TileKind,
    pub cells: PosSet,
    pub spawn_bomb: BombKind,
    pub bomb_origin: Option<Pos>,
}

impl MatchGroup {
    pub fn simple(kind: TileKind, cells: PosSet) -> MatchGroup {
        MatchGroup { kind, cells, spawn_bomb: BombKind::None, bomb_origin: None }
    }
}

#[cfg(test)]
mod law_tests {
    //! Detector/planner laws checked over pseudo-random components.

    use super::*;
    use crate::match_three::rng::DeterministicRng;
    use crate::match_three::sets::SetOps;

    /// Random cell soup in a 6x6 box, split into its connected pieces.
    fn random_pieces(rng: &mut DeterministicRng) -> Vec<PosSet> {
        let mut cells = PosSet::new();
        for y in 0..6 {
            for x in 0..6 {
                if rng.next_below(100) < 55 {
                    cells.insert(&Pos::new(x, y));
                }
            }
        }
        runs::connected_pieces(&cells)
    }

    fn plan_piece(piece: &PosSet) -> Vec<MatchGroup> {
        let (hruns, vruns) = runs::runs_in(piece);
        let found = shapes::detect(piece, &hruns, &vruns);
        planner::plan(TileKind::Red, piece, found)
    }

    #[test]
    fn selections_are_disjoint_and_contained() {
        let mut rng = DeterministicRng::new(2024);
        for _ in 0..200 {
            for piece in random_pieces(&mut rng) {
                let groups = plan_piece(&piece);

                for (i, a) in groups.iter().enumerate() {
                    assert!(a.cells.difference(&piece).is_empty(), "group escaped its component");
                    for b in groups.iter().skip(i + 1) {
                        assert!(!a.cells.intersects(&b.cells), "overlapping groups selected");
                    }
                }
            }
        }
    }

    #[test]
    fn group_sizes_match_their_spawns() {
        let mut rng = DeterministicRng::new(77);
        for _ in 0..200 {
            for piece in random_pieces(&mut rng) {
                for group in plan_piece(&piece) {
                    match group.spawn_bomb {
                        // Simple groups carry at least a run of three.
                        BombKind::None => assert!(group.cells.len() >= 3),
                        BombKind::Ufo => assert!(group.cells.len() >= 4),
                        BombKind::HorizontalRocket | BombKind::VerticalRocket => {
                            assert!(group.cells.len() >= 4)
                        }
                        // Rainbows come from five in a line.
                        BombKind::ColorBomb => assert!(group.cells.len() >= 5),
                        BombKind::AreaBomb => assert!(group.cells.len() >= 5),
                    }
                }
            }
        }
    }

    #[test]
    fn planning_is_deterministic() {
        let mut rng = DeterministicRng::new(13);
        for _ in 0..50 {
            for piece in random_pieces(&mut rng) {
                assert_eq!(plan_piece(&piece), plan_piece(&piece));
            }
        }
    }
}
