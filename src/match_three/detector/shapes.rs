use super::runs::Run;
use crate::match_three::consts::BombKind;
use crate::match_three::coords::Pos;
use crate::match_three::sets::{PosSet, SetOps};

/// Candidate weights, in planner units.
const WEIGHT_ROCKET: u16 = 40;
const WEIGHT_RAINBOW: u16 = 130;
const WEIGHT_AREA: u16 = 60;
const WEIGHT_UFO: u16 = 20;

/// The template family a candidate was recognized as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeClass {
    Line4,
    Line5,
    Square,
    Intersection,
}

/// One bomb-spawning template found inside a component. Candidates may
/// overlap each other; the planner picks the winning disjoint subset.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedShape {
    pub kind: BombKind,
    pub shape: ShapeClass,
    pub cells: PosSet,
    pub weight: u16,
    pub anchor: Pos,
}

impl DetectedShape {
    /// Whether the candidate is a straight line (and along which axis).
    pub fn line_axis(&self) -> Option<bool> {
        match self.shape {
            ShapeClass::Line4 | ShapeClass::Line5 => {
                let first = self.cells.first().expect("line candidate has cells");
                Some(self.cells.iter().all(|c| c.y == first.y))
            }
            _ => None,
        }
    }
}

/// Runs all three recognition rules over one connected component. The
/// component must be 4-connected and single-coloured; the caller guarantees
/// it (a disconnected input is a caller bug).
pub fn detect(component: &PosSet, hruns: &[Run], vruns: &[Run]) -> Vec<DetectedShape> {
    debug_assert!(
        super::runs::connected_pieces(component).len() == 1,
        "shape detection over a disconnected component"
    );

    let mut found = Vec::new();
    line_rule(hruns, &mut found);
    line_rule(vruns, &mut found);
    square_rule(component, hruns, vruns, &mut found);
    intersection_rule(hruns, vruns, &mut found);
    found
}

/// A window of `len` cells of a run, anchored at `offset` from its start.
fn window(run: &Run, offset: i32, len: usize) -> (Pos, PosSet) {
    let anchor = if run.horizontal {
        Pos::new(run.start.x + offset, run.start.y)
    } else {
        Pos::new(run.start.x, run.start.y + offset)
    };
    let sub = Run { start: anchor, len, horizontal: run.horizontal };
    (anchor, sub.cells().collect())
}

/// The rocket a line spawns fires across the line's axis.
fn orthogonal_rocket(horizontal_run: bool) -> BombKind {
    if horizontal_run {
        BombKind::VerticalRocket
    } else {
        BombKind::HorizontalRocket
    }
}

fn line_rule(runs: &[Run], found: &mut Vec<DetectedShape>) {
    for run in runs {
        match run.len {
            0..=3 => {}
            4 => {
                let (anchor, cells) = window(run, 0, 4);
                found.push(DetectedShape {
                    kind: orthogonal_rocket(run.horizontal),
                    shape: ShapeClass::Line4,
                    cells,
                    weight: WEIGHT_ROCKET,
                    anchor,
                });
            }
            5 => {
                let (anchor, cells) = window(run, 0, 5);
                found.push(DetectedShape {
                    kind: BombKind::ColorBomb,
                    shape: ShapeClass::Line5,
                    cells,
                    weight: WEIGHT_RAINBOW,
                    anchor,
                });
            }
            len => {
                for offset in 0..=(len - 5) as i32 {
                    let (anchor, cells) = window(run, offset, 5);
                    found.push(DetectedShape {
                        kind: BombKind::ColorBomb,
                        shape: ShapeClass::Line5,
                        cells,
                        weight: WEIGHT_RAINBOW,
                        anchor,
                    });
                }
                // Rockets only anchor at the two ends of a long run.
                for offset in [0, (len - 4) as i32] {
                    let (anchor, cells) = window(run, offset, 4);
                    found.push(DetectedShape {
                        kind: orthogonal_rocket(run.horizontal),
                        shape: ShapeClass::Line4,
                        cells,
                        weight: WEIGHT_ROCKET,
                        anchor,
                    });
                }
            }
        }
    }
}

/// Length of the run in `runs` covering `pos`, if any.
fn run_len_at(runs: &[Run], pos: &Pos) -> usize {
    runs.iter().find(|r| r.contains(pos)).map_or(0, |r| r.len)
}

fn square_rule(component: &PosSet, hruns: &[Run], vruns: &[Run], found: &mut Vec<DetectedShape>) {
    for p in component.iter() {
        let corners =
            [p, Pos::new(p.x + 1, p.y), Pos::new(p.x, p.y + 1), Pos::new(p.x + 1, p.y + 1)];
        if !corners.iter().all(|c| component.contains(c)) {
            continue;
        }

        // Inside a 2xN rectangle rockets dominate; a square whose both rows
        // (or both columns) sit on >=4 runs is noise.
        let rows_dominated =
            run_len_at(hruns, &corners[0]) >= 4 && run_len_at(hruns, &corners[2]) >= 4;
        let cols_dominated =
            run_len_at(vruns, &corners[0]) >= 4 && run_len_at(vruns, &corners[1]) >= 4;
        if rows_dominated || cols_dominated {
            continue;
        }

        found.push(DetectedShape {
            kind: BombKind::Ufo,
            shape: ShapeClass::Square,
            cells: corners.iter().collect(),
            weight: WEIGHT_UFO,
            anchor: p,
        });
    }
}

fn intersection_rule(hruns: &[Run], vruns: &[Run], found: &mut Vec<DetectedShape>) {
    for h in hruns {
        for v in vruns {
            let cross = Pos::new(v.start.x, h.start.y);
            if !h.contains(&cross) || !v.contains(&cross) {
                continue;
            }
            if h.len + v.len - 1 < 5 {
                continue;
            }
            let cells: PosSet = h.cells().chain(v.cells()).collect();
            found.push(DetectedShape {
                kind: BombKind::AreaBomb,
                shape: ShapeClass::Intersection,
                cells,
                weight: WEIGHT_AREA,
                anchor: cross,
            });
        }
    }
}
