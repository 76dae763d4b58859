use crate::match_three::board::GameState;
use crate::match_three::consts::TileKind;

/// Decides the colour of every refill tile. Injected; level analyzers swap in
/// biased models to stress particular boards. All randomness must come from
/// the state RNG or determinism breaks.
pub trait SpawnModel {
    fn predict(&self, state: &mut GameState, column: usize) -> TileKind;
}

/// Uniform draw over the level's active palette.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformSpawn;

impl SpawnModel for UniformSpawn {
    fn predict(&self, state: &mut GameState, _column: usize) -> TileKind {
        let palette = state.palette();
        let pick = state.random.next_below(palette.len() as i32) as usize;
        palette[pick]
    }
}
