use crate::match_three::board::{GameState, HitOutcome};
use crate::match_three::coords::Pos;
use crate::match_three::sets::{PosSet, SetOps};

/// One in-flight blast. Target cells are reserved (suspended) for its whole
/// lifetime and resolve in waves: cells at Chebyshev distance `w` from the
/// origin go when wave `w` arrives.
#[derive(Clone, Debug)]
pub struct Explosion {
    origin: Pos,
    cells: PosSet,
    elapsed: f32,
    wave_interval: f32,
    next_wave: u32,
    max_distance: u32,
}

impl Explosion {
    fn new(origin: Pos, cells: PosSet, wave_interval: f32) -> Explosion {
        let max_distance =
            cells.iter().map(|c| origin.chebyshev(&c)).max().unwrap_or(0);
        Explosion { origin, cells, elapsed: 0.0, wave_interval, next_wave: 0, max_distance }
    }

    fn done(&self) -> bool {
        self.next_wave > self.max_distance
    }

    /// Whether this explosion still holds the cell (its wave has not yet
    /// swept over it).
    fn holds(&self, pos: &Pos) -> bool {
        !self.done()
            && self.origin.chebyshev(pos) >= self.next_wave
            && self.cells.contains(pos)
    }
}

/// What one scheduler step did; the engine turns it into events, objective
/// progress and follow-up activations.
#[derive(Clone, Debug, Default)]
pub struct WaveReport {
    pub resolved: Vec<(Pos, HitOutcome)>,
    /// Bombs swept by a wave: handed to the activator, not destroyed.
    pub triggered: Vec<Pos>,
}

impl WaveReport {
    pub fn clear(&mut self) {
        self.resolved.clear();
        self.triggered.clear();
    }
}

/// Owns every active explosion of one engine. Waves advance on simulation
/// time; chained bombs come back out through the [WaveReport] and re-enter as
/// new targeted explosions, which is what makes cascades wave-by-wave rather
/// than instant.
#[derive(Clone, Debug, Default)]
pub struct ExplosionScheduler {
    active: Vec<Explosion>,
}

impl ExplosionScheduler {
    pub fn new() -> ExplosionScheduler {
        ExplosionScheduler::default()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Starts a blast over every cell within Chebyshev radius `r` of the
    /// origin, reserving the area immediately.
    pub fn spawn_radial(&mut self, state: &mut GameState, origin: Pos, r: i32, wave_interval: f32) {
        let mut cells = PosSet::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let p = Pos::new(origin.x + dx, origin.y + dy);
                if state.in_bounds(&p) {
                    cells.insert(&p);
                }
            }
        }
        self.spawn_targeted(state, origin, cells, wave_interval);
    }

    /// Starts a blast over an explicit cell list, reserving it immediately.
    pub fn spawn_targeted(
        &mut self,
        state: &mut GameState,
        origin: Pos,
        cells: PosSet,
        wave_interval: f32,
    ) {
        if cells.is_empty() {
            return;
        }
        for pos in cells.iter() {
            if let Some(tile) = state.tile_mut(&pos) {
                tile.suspended = true;
            }
        }
        self.active.push(Explosion::new(origin, cells, wave_interval));
    }

    /// Advances all explosions by `dt`, resolving any waves that came due.
    /// Explosions resolve in creation order; cells within a wave resolve in
    /// set order. Both are deterministic.
    pub fn advance(&mut self, state: &mut GameState, dt: f32, report: &mut WaveReport) {
        for i in 0..self.active.len() {
            self.active[i].elapsed += dt;
            let due = (self.active[i].elapsed / self.active[i].wave_interval) as u32;

            while self.active[i].next_wave <= due && !self.active[i].done() {
                let wave = self.active[i].next_wave;
                let origin = self.active[i].origin;
                let wave_cells: Vec<Pos> = self.active[i]
                    .cells
                    .iter()
                    .filter(|c| origin.chebyshev(c) == wave)
                    .collect();
                self.active[i].next_wave += 1;

                for pos in wave_cells {
                    let is_armed = pos != origin
                        && state.tile(&pos).map_or(false, |t| t.has_bomb());

                    if is_armed {
                        report.triggered.push(pos);
                    } else {
                        let outcome = state.hit_cell(&pos);
                        if outcome != HitOutcome::Nothing {
                            report.resolved.push((pos, outcome));
                        }
                    }
                    self.release(state, &pos);
                }
            }
        }

        self.active.retain(|e| !e.done());
    }

    /// Clears the suspension on a processed cell unless another active
    /// explosion still holds it.
    fn release(&self, state: &mut GameState, pos: &Pos) {
        if self.active.iter().any(|e| e.holds(pos)) {
            return;
        }
        if let Some(tile) = state.tile_mut(pos) {
            tile.suspended = false;
        }
    }
}
