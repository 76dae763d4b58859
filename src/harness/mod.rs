mod options;

use std::sync::atomic::AtomicBool;

pub use options::HarnessOptions;

use rand::Rng;

use crate::analyzer::{analyze_level, AnalysisOptions};
use crate::match_three::notation::LevelString;
use crate::utils::prelude::*;

/// Ships with the binary so `cascade` runs without arguments: an open board
/// with a modest colour objective.
pub const DEMO_LEVEL: &str = "8x8;colours=5;moves=25;obj=tile:R:40";

/// Drives one full analysis run from parsed options to logged report.
pub struct Harness {
    options: HarnessOptions,
    cancel: AtomicBool,
}

impl Harness {
    pub fn new(options: HarnessOptions) -> Harness {
        Harness { options, cancel: AtomicBool::new(false) }
    }

    pub fn run(&self) -> Result<()> {
        let source = self.options.level.as_deref().unwrap_or(DEMO_LEVEL);
        let parsed = source.parse::<LevelString>().context("parsing level notation")?;

        let seed = self.options.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let analysis = AnalysisOptions {
            simulations: self.options.simulations,
            threads: self.options.threads,
            seed,
        };

        log::info!(
            "analyzing {}x{} level: {} simulations on {} threads, seed {seed}",
            parsed.level.width,
            parsed.level.height,
            analysis.simulations,
            analysis.threads,
        );

        let report = analyze_level(&parsed.level, &analysis, &self.cancel)?;

        log::info!(
            "completion {:.1}% ({}/{}), avg score {:.0} (best {}, worst {}), avg moves {:.1}",
            report.completion_rate() * 100.0,
            report.completed,
            report.simulations,
            report.average_score(),
            report.best_score,
            report.worst_score,
            report.average_moves(),
        );
        if report.dead_boards > 0 {
            log::warn!("{} rollouts dead-ended with no valid swap", report.dead_boards);
        }
        if report.non_converged > 0 {
            log::warn!("{} rollouts blew the settle budget", report.non_converged);
        }

        Ok(())
    }
}
