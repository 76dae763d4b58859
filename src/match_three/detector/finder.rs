use super::{planner, runs, shapes, MatchGroup};
use crate::match_three::board::GameState;
use crate::match_three::coords::Pos;
use crate::match_three::rng::DeterministicRng;
use crate::match_three::sets::SetOps;

/// Scans the whole board for matches: splits it into same-colour components,
/// keeps the ones carrying a run of three or a bomb template, and plans each
/// into disjoint groups. Components resolve in row-major order of their first
/// cell, so the group list is deterministic.
pub fn find_matches(state: &GameState) -> Vec<MatchGroup> {
    let mut groups = Vec::new();
    find_matches_into(state, &mut groups);
    groups
}

/// Out-parameter variant: the engine hands in a pooled group list.
pub fn find_matches_into(state: &GameState, groups: &mut Vec<MatchGroup>) {
    for (kind, component) in runs::components(state) {
        let (hruns, vruns) = runs::runs_in(&component);
        let found = shapes::detect(&component, &hruns, &vruns);
        // A component matches if it carries a bomb template (a bare 2x2 is
        // one) or a plain run of three.
        if found.is_empty() && hruns.is_empty() && vruns.is_empty() {
            continue;
        }
        groups.extend(planner::plan(kind, &component, found));
    }
}

/// Stamps a bomb origin onto every bomb-spawning group. The swap foci win
/// when they lie inside the group; otherwise the RNG picks uniformly over the
/// group's cells. RNG draws happen in group order, keeping the stream stable.
pub fn assign_origins(groups: &mut [MatchGroup], foci: &[Pos], rng: &mut DeterministicRng) {
    for group in groups.iter_mut() {
        if group.spawn_bomb == crate::match_three::consts::BombKind::None {
            continue;
        }

        let inside: Vec<Pos> =
            foci.iter().copied().filter(|f| group.cells.contains(f)).collect();

        group.bomb_origin = Some(match inside.len() {
            1 => inside[0],
            2 => inside[rng.next_below(2) as usize],
            _ => {
                let pick = rng.next_below(group.cells.len() as i32) as usize;
                group.cells.nth(pick).expect("non-empty group")
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_three::consts::{BombKind, TileKind};
    use crate::match_three::level::LevelConfig;
    use crate::match_three::sets::PosSet;

    /// Builds a state from rows of kind characters, no gravity applied.
    fn board(rows: &[&str]) -> GameState {
        let mut level = LevelConfig::blank(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                level.cell_mut(x, y).kind = TileKind::parse(c).unwrap();
            }
        }
        GameState::new(&level, 1).unwrap()
    }

    #[test]
    fn finds_one_group_per_colour_component() {
        let state = board(&[
            "RRRB", //
            "GGGB", //
            "YYYB", //
        ]);
        let groups = find_matches(&state);

        // Three horizontal triples plus the blue column.
        assert_eq!(groups.len(), 4);
        assert!(groups.iter().all(|g| g.spawn_bomb == BombKind::None));
    }

    #[test]
    fn ignores_boards_without_runs(){
        let state = board(&[
            "RGB", //
            "GBR", //
            "BRG", //
        ]);
        assert!(find_matches(&state).is_empty());
    }

    #[test]
    fn focus_inside_group_becomes_origin() {
        let cells: PosSet =
            [Pos::new(1, 0), Pos::new(1, 1), Pos::new(1, 2), Pos::new(1, 3)].into_iter().collect();
        let mut groups = vec![MatchGroup {
            kind: TileKind::Red,
            cells,
            spawn_bomb: BombKind::HorizontalRocket,
            bomb_origin: None,
        }];

        let mut rng = DeterministicRng::new(3);
        assign_origins(&mut groups, &[Pos::new(1, 1), Pos::new(0, 1)], &mut rng);
        assert_eq!(groups[0].bomb_origin, Some(Pos::new(1, 1)));
    }

    #[test]
    fn origin_without_focus_is_drawn_from_the_group() {
        let cells: PosSet =
            [Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0), Pos::new(3, 0)].into_iter().collect();
        let mut groups = vec![MatchGroup {
            kind: TileKind::Red,
            cells: cells.clone(),
            spawn_bomb: BombKind::VerticalRocket,
            bomb_origin: None,
        }];

        let mut rng = DeterministicRng::new(3);
        assign_origins(&mut groups, &[], &mut rng);
        assert!(cells.contains(&groups[0].bomb_origin.unwrap()));
    }

    #[test]
    fn simple_groups_get_no_origin() {
        let cells: PosSet =
            [Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)].into_iter().collect();
        let mut groups = vec![MatchGroup::simple(TileKind::Blue, cells)];

        let mut rng = DeterministicRng::new(3);
        assign_origins(&mut groups, &[Pos::new(0, 0)], &mut rng);
        assert_eq!(groups[0].bomb_origin, None);
    }
}
