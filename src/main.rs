use pfield::{Scenario, ScenarioConfig};
use pfield::{run_2d, run_headless};
use pfield::bench_tick;
use pfield::logger::log_init;

use clap::Parser;
use anyhow::{Context, Result};

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file inside `scenarios/`
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run without a window for this many frames
    #[arg(long)]
    headless: Option<usize>,

    /// Time the simulator tick and exit
    #[arg(long)]
    bench: bool,

    /// Log file, receives every level
    #[arg(long, default_value = "pfield.log")]
    log_file: String,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    ScenarioConfig::load(&config_path).with_context(|| format!("failed to load scenario {}", config_path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    log_init(&args.log_file)?;

    if args.bench {
        bench_tick();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build_scenario(scenario_cfg);

    match args.headless {
        Some(frames) => run_headless(scenario, frames),
        None => run_2d(scenario),
    }

    Ok(())
}
