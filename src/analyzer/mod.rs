mod rollout;

pub use rollout::{simulate, RolloutOutcome, RolloutRecord};

use std::sync::atomic::{AtomicBool, Ordering};

use crate::match_three::level::LevelConfig;
use crate::utils::prelude::*;

/// How hard to drive a level analysis.
#[derive(Clone, Copy, Debug)]
pub struct AnalysisOptions {
    pub simulations: usize,
    pub threads: usize,
    /// Root seed; simulation `i` runs under `seed + i`.
    pub seed: u64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions { simulations: 100, threads: 1, seed: 1 }
    }
}

/// Aggregate over many independent rollouts of one level.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnalysisReport {
    pub simulations: usize,
    pub completed: usize,
    pub out_of_moves: usize,
    pub dead_boards: usize,
    pub non_converged: usize,
    pub total_score: i64,
    pub total_moves: u64,
    pub best_score: i64,
    pub worst_score: i64,
}

impl AnalysisReport {
    fn absorb(&mut self, record: &RolloutRecord) {
        if self.simulations == 0 {
            self.best_score = record.score;
            self.worst_score = record.score;
        } else {
            self.best_score = self.best_score.max(record.score);
            self.worst_score = self.worst_score.min(record.score);
        }
        self.simulations += 1;
        self.total_score += record.score;
        self.total_moves += record.moves as u64;
        match record.outcome {
            RolloutOutcome::Completed => self.completed += 1,
            RolloutOutcome::OutOfMoves => self.out_of_moves += 1,
            RolloutOutcome::DeadBoard => self.dead_boards += 1,
            RolloutOutcome::NonConverged => self.non_converged += 1,
        }
    }

    fn merge(&mut self, other: &AnalysisReport) {
        if other.simulations > 0 {
            if self.simulations == 0 {
                self.best_score = other.best_score;
                self.worst_score = other.worst_score;
            } else {
                self.best_score = self.best_score.max(other.best_score);
                self.worst_score = self.worst_score.min(other.worst_score);
            }
        }
        self.simulations += other.simulations;
        self.completed += other.completed;
        self.out_of_moves += other.out_of_moves;
        self.dead_boards += other.dead_boards;
        self.non_converged += other.non_converged;
        self.total_score += other.total_score;
        self.total_moves += other.total_moves;
    }

    pub fn completion_rate(&self) -> f64 {
        if self.simulations == 0 {
            return 0.0;
        }
        self.completed as f64 / self.simulations as f64
    }

    pub fn average_score(&self) -> f64 {
        if self.simulations == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.simulations as f64
    }

    pub fn average_moves(&self) -> f64 {
        if self.simulations == 0 {
            return 0.0;
        }
        self.total_moves as f64 / self.simulations as f64
    }
}

/// Runs `options.simulations` independent rollouts of the level, spread over
/// worker threads. Every worker owns its engines and pools outright; the only
/// shared state is the cancellation flag, checked between simulations.
pub fn analyze_level(
    level: &LevelConfig,
    options: &AnalysisOptions,
    cancel: &AtomicBool,
) -> Result<AnalysisReport> {
    level.validate()?;
    let threads = options.threads.max(1);

    let mut report = AnalysisReport::default();
    std::thread::scope(|scope| -> Result<()> {
        let mut workers = Vec::with_capacity(threads);
        for worker in 0..threads {
            let first = worker * options.simulations / threads;
            let last = (worker + 1) * options.simulations / threads;
            workers.push(scope.spawn(move || -> Result<AnalysisReport> {
                let mut partial = AnalysisReport::default();
                for i in first..last {
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    let record = simulate(level, options.seed.wrapping_add(i as u64))?;
                    partial.absorb(&record);
                }
                Ok(partial)
            }));
        }
        for worker in workers {
            let partial = worker
                .join()
                .map_err(|_| anyhow!("analysis worker panicked"))??;
            report.merge(&partial);
        }
        Ok(())
    })?;

    Ok(report)
}
