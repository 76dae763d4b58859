/*
 *  The deterministic core of a match-three puzzle simulation.
 */

pub(crate) mod board;
pub mod bombs;
pub mod consts;
pub mod coords;
pub(crate) mod detector;
pub mod engine;
pub mod events;
pub mod level;
pub mod notation;
pub mod pool;
pub mod rng;
pub mod sets;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        board::{Cover, CoverKind, GameState, Ground, GroundKind, Tile},
        bombs::{combos, effects},
        consts::*,
        coords::{self, *},
        detector::{DetectedShape, MatchGroup, ShapeClass},
        engine::{
            find_valid_swaps, Engine, EngineConfig, MoveError, MoveIntent, ScoreSystem,
            Settle, SpawnModel, StandardScoring, UniformSpawn,
        },
        events::{BufferCollector, Event, EventCollector, NullCollector, SharedCollector},
        level::{CellSpec, LevelConfig, Objective, ObjectiveLayer},
        notation::LevelString,
        pool::Pools,
        rng::DeterministicRng,
        sets::*,
    };

    pub use super::sets::SetOps;
}
