use crate::match_three::consts::{BombKind, TileKind};
use crate::match_three::coords::Pos;
use crate::match_three::board::{CoverKind, GroundKind};

/// Everything observable the simulation does, in the order it does it. The
/// stream is totally ordered and stable for a given (state, seed, moves).
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    TilesSwapped { from: Pos, to: Pos, is_revert: bool },
    MatchDetected { positions: Vec<Pos>, tile_count: usize, spawn_bomb: BombKind },
    BombCreated { position: Pos, kind: BombKind },
    TileDestroyed { position: Pos, kind: TileKind },
    CoverDestroyed { position: Pos, kind: CoverKind },
    GroundDamaged { position: Pos, kind: GroundKind, remaining_hp: u8 },
    TileLanded { position: Pos },
    TileSpawned { position: Pos, kind: TileKind },
    ScoreChanged { delta: i32 },
    ObjectiveProgress { index: usize, current: u16 },
    LevelCompleted,
}

/// Sink for simulation events. Injected into the engine; rollouts swap in a
/// [NullCollector] so cascades cost no allocation.
pub trait EventCollector {
    fn emit(&mut self, event: Event);

    /// When false, the engine skips event construction entirely.
    fn is_enabled(&self) -> bool {
        true
    }

    fn emit_all(&mut self, events: impl IntoIterator<Item = Event>)
    where
        Self: Sized,
    {
        for event in events {
            self.emit(event);
        }
    }
}

/// Discards everything; `is_enabled` short-circuits emission.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCollector;

impl EventCollector for NullCollector {
    fn emit(&mut self, _event: Event) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Records the stream in order.
#[derive(Clone, Debug, Default)]
pub struct BufferCollector {
    pub events: Vec<Event>,
}

impl BufferCollector {
    pub fn new() -> BufferCollector {
        BufferCollector::default()
    }

    pub fn take(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl EventCollector for BufferCollector {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}

/// Records through a shared handle, so a caller can hand the engine its sink
/// and still read the stream afterwards. Engines are single-threaded; the
/// handle must not cross threads.
#[derive(Clone, Debug, Default)]
pub struct SharedCollector {
    events: std::rc::Rc<std::cell::RefCell<Vec<Event>>>,
}

impl SharedCollector {
    pub fn new() -> SharedCollector {
        SharedCollector::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventCollector for SharedCollector {
    fn emit(&mut self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}
