use std::fs::File;

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

/// Terminal logger at debug (debug builds) or info (release), plus a full
/// trace log written to `file_name`
pub fn log_init(file_name: &str) -> Result<()> {
    #[cfg(debug_assertions)]
    let log_level = LevelFilter::Debug;

    #[cfg(not(debug_assertions))]
    let log_level = LevelFilter::Info;

    let file = File::create(file_name).with_context(|| format!("failed to create log file {file_name}"))?;

    CombinedLogger::init(vec![
        TermLogger::new(log_level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(LevelFilter::Trace, Config::default(), file),
    ])
    .context("logger already initialised")?;

    Ok(())
}
