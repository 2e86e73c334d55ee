//! ShuddhiSim - headless runner for the vacuum coverage simulation.
//!
//! Builds a simulation from a named layout, runs the tick loop to
//! completion (or a tick limit / ctrl-c), and logs coverage statistics
//! along the way. Rendering and the web transport live elsewhere; this
//! binary only drives the core.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use shuddhi_sim::{AlgorithmKind, Result, SimConfig, Simulation};

/// Ticks between progress log lines.
const STATS_INTERVAL: u64 = 500;

#[derive(Parser, Debug)]
#[command(name = "shuddhi-sim", about = "Robot vacuum coverage simulator")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Motion strategy
    #[arg(short, long, value_enum, default_value = "random")]
    algorithm: AlgorithmKind,

    /// Layout id from the configuration's default layouts
    #[arg(short, long, default_value = "1")]
    layout: String,

    /// Hard tick limit (overrides the configured limit; 0 = unlimited)
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Seed for the random heading stream (reproducible runs)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shuddhi_sim=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            SimConfig::load(path)?
        }
        None => {
            info!("Using default configuration");
            SimConfig::default()
        }
    };
    let max_ticks = args.max_ticks.unwrap_or(config.simulation.max_ticks);

    // Cooperative stop: ctrl-c raises the flag, the loop polls it at the
    // top of every tick
    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))
        .map_err(shuddhi_sim::SimError::Io)?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop))
        .map_err(shuddhi_sim::SimError::Io)?;

    let mut sim = Simulation::from_config(&config, &args.layout, args.algorithm, args.seed)?;
    sim.start_simulation()?;

    loop {
        if stop.load(Ordering::Relaxed) {
            warn!(ticks = sim.ticks(), "stop requested, ending run");
            break;
        }
        if max_ticks > 0 && sim.ticks() >= max_ticks {
            warn!(ticks = sim.ticks(), "tick limit reached, ending run");
            break;
        }
        let (keep_running, _events) = sim.step()?;
        if sim.ticks() % STATS_INTERVAL == 0 {
            info!(
                ticks = sim.ticks(),
                coverage = sim.coverage(),
                full_coverage = sim.full_coverage(),
                "progress"
            );
        }
        if !keep_running {
            break;
        }
    }

    let snapshot = sim.snapshot();
    info!(
        ticks = snapshot.ticks,
        coverage = snapshot.coverage,
        full_coverage = snapshot.full_coverage,
        dirt_collected = snapshot.robot.map(|r| r.dirt_collected).unwrap_or(0),
        run_mode = ?snapshot.run_mode,
        "run finished"
    );
    Ok(())
}
