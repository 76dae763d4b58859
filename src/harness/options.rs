use clap::Parser;

/// Command-line surface of the headless analyzer binary.
#[derive(Clone, Debug, Parser)]
pub struct HarnessOptions {
    /// Level notation string; the built-in demo level when absent.
    #[arg(short, long)]
    pub level: Option<String>,

    #[arg(short = 'n', long, default_value_t = 200)]
    pub simulations: usize,

    #[arg(short, long, default_value_t = 4)]
    pub threads: usize,

    /// Root seed; drawn from entropy when absent.
    #[arg(short, long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub log_level: Option<String>,
}
