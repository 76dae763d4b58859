pub(crate) mod explosions;
pub(crate) mod moves;
pub(crate) mod processor;
pub(crate) mod scoring;
pub(crate) mod spawning;

pub use explosions::{Explosion, ExplosionScheduler, WaveReport};
pub use moves::find_valid_swaps;
pub use processor::ProcessReport;
pub use scoring::{ScoreSystem, StandardScoring};
pub use spawning::{SpawnModel, UniformSpawn};

use thiserror::Error;

use crate::match_three::board::{GameState, HitOutcome};
use crate::match_three::bombs::{combos, effects};
use crate::match_three::consts::{
    BombKind, TileKind, SETTLE_TICK_BUDGET, SWAP_DURATION, TICK_DT, WAVE_INTERVAL,
};
use crate::match_three::coords::{Direction, Pos};
use crate::match_three::detector;
use crate::match_three::events::{Event, EventCollector, NullCollector};
use crate::match_three::level::{LevelConfig, ObjectiveLayer};
use crate::match_three::pool::Pools;
use crate::match_three::sets::SetOps;

/// Fixed-step integration parameters. Swap duration is a contract (revert
/// timing is observable); easing is not simulated.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub tick_dt: f32,
    pub swap_duration: f32,
    pub wave_interval: f32,
    pub settle_budget: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tick_dt: TICK_DT,
            swap_duration: SWAP_DURATION,
            wave_interval: WAVE_INTERVAL,
            settle_budget: SETTLE_TICK_BUDGET,
        }
    }
}

/// Why a move was rejected. Rejection mutates nothing and emits nothing.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("position {0} is outside the board")]
    OutOfBounds(Pos),
    #[error("cells {0} and {1} are not orthogonal neighbours")]
    NotAdjacent(Pos, Pos),
    #[error("cell {0} is empty")]
    EmptyCell(Pos),
    #[error("cell {0} is reserved by an explosion")]
    SuspendedCell(Pos),
    #[error("a swap is already in flight")]
    SwapInFlight,
    #[error("cell {0} carries nothing to activate")]
    NothingToActivate(Pos),
    #[error("the move limit is exhausted")]
    MoveLimitReached,
}

/// Player gestures, as the input layer hands them over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveIntent {
    Tap { position: Pos },
    Swipe { from: Pos, direction: Direction },
}

/// Outcome of `run_until_stable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settle {
    Stable { ticks: u64 },
    /// The tick budget ran out first; the state stays usable.
    NonConverged,
}

#[derive(Clone, Copy, Debug)]
struct SwapRecord {
    from: Pos,
    to: Pos,
    deadline: f32,
}

/// One deterministic simulation: a state, a scheduler, injected collaborators
/// and the fixed-step loop over them. One engine per logical task; analyzers
/// run many engines, each on its own thread with its own seed.
pub struct Engine {
    pub state: GameState,
    config: EngineConfig,
    pending_swap: Option<SwapRecord>,
    scheduler: ExplosionScheduler,
    collector: Box<dyn EventCollector>,
    scoring: Box<dyn ScoreSystem>,
    spawner: Box<dyn SpawnModel>,
    pools: Pools,
    /// Swap endpoints of the committing move; consumed by the first match
    /// wave for bomb-origin placement, empty for cascade waves.
    foci: Vec<Pos>,
    wave_scratch: WaveReport,
    completion_emitted: bool,
}

impl Engine {
    pub fn new(level: &LevelConfig, seed: u64) -> crate::utils::prelude::Result<Engine> {
        Ok(Engine {
            state: GameState::new(level, seed)?,
            config: EngineConfig::default(),
            pending_swap: None,
            scheduler: ExplosionScheduler::new(),
            collector: Box::new(NullCollector),
            scoring: Box::new(StandardScoring),
            spawner: Box::new(UniformSpawn),
            pools: Pools::new(),
            foci: Vec::new(),
            wave_scratch: WaveReport::default(),
            completion_emitted: false,
        })
    }

    pub fn with_collector(mut self, collector: Box<dyn EventCollector>) -> Engine {
        self.collector = collector;
        self
    }

    pub fn with_scoring(mut self, scoring: Box<dyn ScoreSystem>) -> Engine {
        self.scoring = scoring;
        self
    }

    pub fn with_spawner(mut self, spawner: Box<dyn SpawnModel>) -> Engine {
        self.spawner = spawner;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Engine {
        self.config = config;
        self
    }

    /// Swaps the event sink, returning the previous one. This is how rollouts
    /// silence the engine around `run_until_stable`.
    pub fn replace_collector(&mut self, collector: Box<dyn EventCollector>) -> Box<dyn EventCollector> {
        std::mem::replace(&mut self.collector, collector)
    }

    fn emit(&mut self, event: Event) {
        if self.collector.is_enabled() {
            self.collector.emit(event);
        }
    }

    /// Translates a gesture into the engine's move surface.
    pub fn apply_intent(&mut self, intent: MoveIntent) -> Result<(), MoveError> {
        match intent {
            MoveIntent::Swipe { from, direction } => {
                self.apply_move(&from, &(from + direction.offset()))
            }
            MoveIntent::Tap { position } => self.tap(&position),
        }
    }

    /// A tap activates a special piece in place; anything else is rejected.
    fn tap(&mut self, position: &Pos) -> Result<(), MoveError> {
        if !self.state.in_bounds(position) {
            return Err(MoveError::OutOfBounds(*position));
        }
        if self.pending_swap.is_some() {
            return Err(MoveError::SwapInFlight);
        }
        let tile = *self.state.tile(position).expect("in-bounds");
        if tile.is_empty() {
            return Err(MoveError::EmptyCell(*position));
        }
        if tile.suspended {
            return Err(MoveError::SuspendedCell(*position));
        }
        if self.state.moves_used >= self.state.move_limit {
            return Err(MoveError::MoveLimitReached);
        }
        if !tile.has_bomb() && tile.kind != TileKind::Rainbow {
            return Err(MoveError::NothingToActivate(*position));
        }

        self.state.moves_used += 1;
        let delta =
            self.scoring.special_move_score(tile.kind, tile.bomb, TileKind::None, BombKind::None);
        self.add_score(delta);
        self.activate_bomb(position);
        Ok(())
    }

    /// Validates and applies a swap. Special endpoints fire the combo handler
    /// immediately; plain swaps wait out the animation and commit only if the
    /// match finder agrees.
    pub fn apply_move(&mut self, from: &Pos, to: &Pos) -> Result<(), MoveError> {
        for pos in [from, to] {
            if !self.state.in_bounds(pos) {
                return Err(MoveError::OutOfBounds(*pos));
            }
        }
        if !from.adjacent(to) {
            return Err(MoveError::NotAdjacent(*from, *to));
        }
        if self.pending_swap.is_some() {
            return Err(MoveError::SwapInFlight);
        }
        for pos in [from, to] {
            let tile = self.state.tile(pos).expect("in-bounds");
            if tile.is_empty() {
                return Err(MoveError::EmptyCell(*pos));
            }
            if tile.suspended {
                return Err(MoveError::SuspendedCell(*pos));
            }
        }
        if self.state.moves_used >= self.state.move_limit {
            return Err(MoveError::MoveLimitReached);
        }

        let a = *self.state.tile(from).expect("in-bounds");
        let b = *self.state.tile(to).expect("in-bounds");
        let special = a.has_bomb()
            || b.has_bomb()
            || a.kind == TileKind::Rainbow
            || b.kind == TileKind::Rainbow;

        self.state.moves_used += 1;

        if special {
            let (ak, ab, bk, bb) = (a.kind, a.bomb, b.kind, b.bomb);
            let delta = self.scoring.special_move_score(ak, ab, bk, bb);
            self.add_score(delta);

            self.foci.clear();
            self.foci.extend([*from, *to]);

            let result = combos::combo_result(&mut self.state, from, to);
            self.scheduler.spawn_targeted(
                &mut self.state,
                *to,
                result.cells,
                self.config.wave_interval,
            );
            for pos in &result.triggered {
                self.activate_bomb(pos);
            }
            return Ok(());
        }

        self.swap_cells(from, to);
        self.pending_swap = Some(SwapRecord {
            from: *from,
            to: *to,
            deadline: self.state.sim_time + self.config.swap_duration,
        });
        self.emit(Event::TilesSwapped { from: *from, to: *to, is_revert: false });
        Ok(())
    }

    /// Logical swap plus the visual/overlay bookkeeping that keeps the
    /// settled-tile invariant intact.
    fn swap_cells(&mut self, a: &Pos, b: &Pos) {
        self.state.swap_tiles(a, b);
        for pos in [a, b] {
            let target = (pos.x as f32, pos.y as f32);
            self.state.tile_mut(pos).expect("in-bounds").visual = target;
        }
        // A bubble rides its tile across the swap.
        let a_dynamic = self.state.cover_at(a).map_or(false, |c| !c.is_none() && c.kind.is_dynamic());
        let b_dynamic = self.state.cover_at(b).map_or(false, |c| !c.is_none() && c.kind.is_dynamic());
        if a_dynamic != b_dynamic {
            let (covered, bare) = if a_dynamic { (*a, *b) } else { (*b, *a) };
            self.state.carry_dynamic_cover(&covered, &bare);
        }
    }

    /// Consumes the bomb at `pos` and launches its blast as a targeted
    /// explosion. No-op on plain cells.
    fn activate_bomb(&mut self, pos: &Pos) {
        let Some(tile) = self.state.tile(pos) else {
            return;
        };
        let kind = if tile.bomb == BombKind::None && tile.kind == TileKind::Rainbow {
            BombKind::ColorBomb
        } else {
            tile.bomb
        };
        if kind == BombKind::None {
            return;
        }

        self.state.tile_mut(pos).expect("in-bounds").bomb = BombKind::None;
        if kind == BombKind::AreaBomb {
            // The area bomb is the one genuinely radial blast.
            self.scheduler.spawn_radial(&mut self.state, *pos, 2, self.config.wave_interval);
            return;
        }
        let cells = effects::affected_cells(&mut self.state, kind, pos);
        self.scheduler.spawn_targeted(&mut self.state, *pos, cells, self.config.wave_interval);
    }

    /// One fixed integration step. Sub-system order is contractual:
    /// explosions, then gravity and refill, then match resolution.
    pub fn tick(&mut self) {
        let dt = self.config.tick_dt;
        self.state.tick += 1;
        self.state.sim_time += dt;
        self.state.clear_landing_flags();

        if !self.scheduler.is_idle() {
            let mut report = std::mem::take(&mut self.wave_scratch);
            report.clear();
            self.scheduler.advance(&mut self.state, dt, &mut report);
            self.apply_wave_report(&report);
            self.wave_scratch = report;
            return;
        }

        let mut landed = self.pools.acquire_positions();
        self.state.advance_gravity(dt, &mut landed);
        for i in 0..landed.len() {
            let pos = landed[i];
            self.emit(Event::TileLanded { position: pos });
        }
        self.pools.release_positions(landed);

        for column in 0..self.state.width() {
            if self.state.needs_refill(column) {
                let kind = self.spawner.predict(&mut self.state, column);
                let pos = self.state.spawn_tile(column, kind);
                self.emit(Event::TileSpawned { position: pos, kind });
            }
        }

        if self.state.any_falling() || !self.scheduler.is_idle() {
            return;
        }

        match self.pending_swap {
            Some(swap) if self.state.sim_time >= swap.deadline => {
                self.pending_swap = None;
                self.foci.clear();
                self.foci.extend([swap.from, swap.to]);
                if !self.resolve_matches() {
                    // Nothing lined up: put the tiles back and refund the move.
                    self.swap_cells(&swap.from, &swap.to);
                    self.foci.clear();
                    self.state.moves_used = self.state.moves_used.saturating_sub(1);
                    self.emit(Event::TilesSwapped {
                        from: swap.from,
                        to: swap.to,
                        is_revert: true,
                    });
                }
            }
            Some(_) => {}
            None => {
                self.resolve_matches();
            }
        }
    }

    /// Runs the finder over the settled board and clears what it returns.
    /// False when the board holds no match.
    fn resolve_matches(&mut self) -> bool {
        let mut groups = self.pools.acquire_groups();
        detector::finder::find_matches_into(&self.state, &mut groups);
        if groups.is_empty() {
            self.pools.release_groups(groups);
            return false;
        }

        detector::assign_origins(&mut groups, &self.foci, &mut self.state.random);
        self.foci.clear();

        if self.collector.is_enabled() {
            for group in &groups {
                self.collector.emit(Event::MatchDetected {
                    positions: group.cells.iter().collect(),
                    tile_count: group.cells.len(),
                    spawn_bomb: group.spawn_bomb,
                });
            }
        }

        let report = processor::process(&mut self.state, &groups, self.scoring.as_ref());
        self.pools.release_groups(groups);

        for (pos, outcome) in &report.resolved {
            self.apply_outcome(pos, outcome);
        }
        for (pos, kind) in &report.spawned {
            self.emit(Event::BombCreated { position: *pos, kind: *kind });
        }
        self.add_score(report.score_delta);
        for pos in &report.triggered {
            self.activate_bomb(pos);
        }
        true
    }

    /// Folds a scheduler step into events, objectives and chained blasts.
    fn apply_wave_report(&mut self, report: &WaveReport) {
        for (pos, outcome) in &report.resolved {
            self.apply_outcome(pos, outcome);
        }
        for pos in &report.triggered {
            self.activate_bomb(pos);
        }
    }

    /// Emits the events a hit produced and advances matching objectives.
    fn apply_outcome(&mut self, pos: &Pos, outcome: &HitOutcome) {
        match *outcome {
            HitOutcome::Nothing => {}
            HitOutcome::CoverHit { kind, destroyed } => {
                if destroyed {
                    self.emit(Event::CoverDestroyed { position: *pos, kind });
                    self.progress_objective(ObjectiveLayer::Cover, kind as i32);
                }
            }
            HitOutcome::TileCleared { kind, ground, .. } => {
                self.emit(Event::TileDestroyed { position: *pos, kind });
                self.progress_objective(ObjectiveLayer::Tile, kind as i32);
                if let Some((ground_kind, remaining)) = ground {
                    self.emit(Event::GroundDamaged {
                        position: *pos,
                        kind: ground_kind,
                        remaining_hp: remaining,
                    });
                    if remaining == 0 {
                        self.progress_objective(ObjectiveLayer::Ground, ground_kind as i32);
                    }
                }
            }
        }
    }

    fn progress_objective(&mut self, layer: ObjectiveLayer, element: i32) {
        for index in 0..self.state.objectives.len() {
            let objective = &mut self.state.objectives[index];
            if !objective.is_active()
                || objective.layer != layer
                || objective.element != element
                || objective.current >= objective.target
            {
                continue;
            }
            objective.current += 1;
            let current = objective.current;
            self.emit(Event::ObjectiveProgress { index, current });
        }

        let any_active = self.state.objectives.iter().any(|o| o.is_active());
        if any_active && !self.completion_emitted && self.state.objectives_complete() {
            self.completion_emitted = true;
            self.emit(Event::LevelCompleted);
        }
    }

    /// Score floors at zero; the delta event still reports what was awarded.
    fn add_score(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        self.state.score = (self.state.score + delta as i64).max(0);
        self.emit(Event::ScoreChanged { delta });
    }

    /// Blasts currently in flight.
    pub fn explosions_active(&self) -> usize {
        self.scheduler.active_count()
    }

    /// Whether no further automatic evolution is pending.
    pub fn is_stable(&self) -> bool {
        self.pending_swap.is_none()
            && self.scheduler.is_idle()
            && !self.state.any_falling()
            && !self.state.any_suspended()
            && detector::find_matches(&self.state).is_empty()
    }

    /// Ticks with events silenced until the board settles or the budget runs
    /// out. A stable board is a no-op. Used by rollouts.
    pub fn run_until_stable(&mut self) -> Settle {
        let saved = self.replace_collector(Box::new(NullCollector));

        let mut result = Settle::NonConverged;
        for elapsed in 0..self.config.settle_budget {
            if self.is_stable() {
                result = Settle::Stable { ticks: elapsed };
                break;
            }
            self.tick();
        }
        if result == Settle::NonConverged && self.is_stable() {
            result = Settle::Stable { ticks: self.config.settle_budget };
        }

        self.collector = saved;
        result
    }

    /// Whether the level's goals are all met.
    pub fn level_complete(&self) -> bool {
        self.state.objectives.iter().any(|o| o.is_active()) && self.state.objectives_complete()
    }

    /// Moves still available to the player.
    pub fn moves_left(&self) -> u16 {
        self.state.move_limit.saturating_sub(self.state.moves_used)
    }
}
