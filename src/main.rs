use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_cascade::prelude::*;

fn main() -> Result<()> {
    // Initialize program options and environment.
    let _ = dotenvy::dotenv();
    let options = HarnessOptions::parse();
    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or("info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(
            match cfg!(debug_assertions) {
                true => AdaptiveFormat::WithThread,
                _    => AdaptiveFormat::Default
            })
        .start()?;

    // Run the headless level analysis.
    if let Err(e) = Harness::new(options).run() {
        log::error!("fatal error: {}", e);
        return Err(e);
    }
    Ok(())
}
