use crate::match_three::engine::{find_valid_swaps, Engine, Settle};
use crate::match_three::level::LevelConfig;
use crate::match_three::rng::DeterministicRng;
use crate::utils::prelude::*;

/// How one rollout ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RolloutOutcome {
    /// All objectives met within the move limit.
    Completed,
    /// The move limit ran out first.
    OutOfMoves,
    /// No swap on the board could commit.
    DeadBoard,
    /// A cascade failed to settle within the tick budget.
    NonConverged,
}

/// The tail state of one rollout.
#[derive(Clone, Copy, Debug)]
pub struct RolloutRecord {
    pub outcome: RolloutOutcome,
    pub score: i64,
    pub moves: u16,
    pub ticks: u64,
}

/// Mixed into the move-picker stream so it never collides with the engine's
/// own draw order.
const PICKER_STREAM_SALT: u64 = 0xA5A5_5A5A_C3C3_3C3C;

/// Plays one level to its end under uniformly random valid moves, with events
/// silenced. Fully deterministic in `(level, seed)`.
pub fn simulate(level: &LevelConfig, seed: u64) -> Result<RolloutRecord> {
    let mut engine = Engine::new(level, seed)?;
    let mut picker = DeterministicRng::new(seed ^ PICKER_STREAM_SALT);

    // Settle the opening board before the first move is considered.
    if engine.run_until_stable() == Settle::NonConverged {
        return Ok(finish(&engine, RolloutOutcome::NonConverged));
    }

    loop {
        if engine.level_complete() {
            return Ok(finish(&engine, RolloutOutcome::Completed));
        }
        if engine.moves_left() == 0 {
            return Ok(finish(&engine, RolloutOutcome::OutOfMoves));
        }

        let swaps = find_valid_swaps(&engine.state);
        if swaps.is_empty() {
            return Ok(finish(&engine, RolloutOutcome::DeadBoard));
        }

        let (from, to) = swaps[picker.next_below(swaps.len() as i32) as usize];
        engine
            .apply_move(&from, &to)
            .map_err(|e| anyhow!("rollout picked an invalid swap {from}->{to}: {e}"))?;

        if engine.run_until_stable() == Settle::NonConverged {
            return Ok(finish(&engine, RolloutOutcome::NonConverged));
        }
    }
}

fn finish(engine: &Engine, outcome: RolloutOutcome) -> RolloutRecord {
    RolloutRecord {
        outcome,
        score: engine.state.score,
        moves: engine.state.moves_used,
        ticks: engine.state.tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_three::notation::LevelString;

    fn level(source: &str) -> LevelConfig {
        source.parse::<LevelString>().unwrap().level
    }

    #[test]
    fn rollouts_are_deterministic() {
        let config = level("6x6;colours=4;moves=8;obj=tile:G:12");

        let a = simulate(&config, 99).unwrap();
        let b = simulate(&config, 99).unwrap();
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.score, b.score);
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.ticks, b.ticks);
    }

    #[test]
    fn rollout_respects_the_move_limit() {
        let config = level("6x6;colours=4;moves=3;obj=tile:R:500");
        let record = simulate(&config, 5).unwrap();

        // An absurd target cannot complete in three moves.
        assert_ne!(record.outcome, RolloutOutcome::Completed);
        assert!(record.moves <= 3);
    }
}
