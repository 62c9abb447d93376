use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, trace};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use swarm_common::{SimulationConfig, Snapshot};
use swarm_engine::{PointerState, SwarmSimulation};

/// Headless runner for the swarm simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config.toml file (built-in defaults if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of ticks to run
    #[arg(long)]
    ticks: Option<u32>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting swarm simulation (CPU parallel)...");

    // --- Load Configuration ---
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => {
            info!("No config file given, using built-in defaults.");
            SimulationConfig::default()
        }
    };
    if let Some(ticks) = args.ticks {
        config.timing.total_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.population.seed = seed;
    }

    info!("Using {} Rayon threads.", rayon::current_num_threads());

    // --- Initialize Simulation ---
    let mut sim = SwarmSimulation::new(config).context("Failed to initialize simulation")?;
    debug!("Settings: {:#?}", sim.settings());

    let total_ticks = sim.config().timing.total_ticks;
    let record_interval = sim.config().timing.record_interval_ticks.max(1);
    let pointer_config = sim.config().pointer.clone();
    info!("Recording snapshot every {} ticks.", record_interval);

    info!("Starting simulation loop for {} ticks...", total_ticks);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    sim.record_snapshot();

    for tick in 0..total_ticks {
        let tick_start_time = Instant::now();
        match PointerState::from_config(&pointer_config, tick) {
            Some(pointer) => sim.tick(true, pointer),
            None => sim.tick(false, PointerState::default()),
        }
        let tick_duration = tick_start_time.elapsed();

        let current_time = Instant::now();
        let print_interval_secs = 5.0;
        let should_print_status = current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_record_tick = (tick + 1) % record_interval == 0;
        let is_last_tick = tick + 1 == total_ticks;

        if should_print_status || is_record_tick || is_last_tick {
            info!(
                "Tick [{}/{}] | Bots: {} | Groups: {} | Trail mass: {:.1} | Tick Time: {:6.2} ms | Elapsed: {:.2} s",
                tick + 1,
                total_ticks,
                sim.population().len(),
                sim.population().num_groups(),
                sim.total_trail_mass(),
                tick_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;

            if is_record_tick || is_last_tick {
                sim.record_snapshot();
            }
        } else {
            trace!(
                "Tick [{}/{}] completed in {:.2} ms",
                tick + 1,
                total_ticks,
                tick_duration.as_secs_f64() * 1000.0
            );
        }
    }

    let total_duration = start_time.elapsed();
    info!("Simulation finished in {:.3} seconds.", total_duration.as_secs_f64());

    // --- Save Recorded Data ---
    let output = sim.config().output.clone();
    if output.save_stats {
        let format = output.format.as_deref().unwrap_or("json");
        if let Err(e) = save_snapshots(sim.recorded_snapshots(), &output.base_filename, format) {
            error!("Error saving snapshots: {:#}", e);
        }
    } else {
        info!("Skipping saving snapshots as per config (save_stats is false).");
    }

    if output.save_positions {
        let filename = format!("{}_final_positions.csv", output.base_filename);
        let mut writer = csv::Writer::from_path(&filename)
            .with_context(|| format!("Failed to create CSV file '{}'", filename))?;
        writer.write_record(["x", "y", "group"])?;
        for (x, y, group) in sim.get_results() {
            writer.write_record(&[format!("{:.4}", x), format!("{:.4}", y), group.to_string()])?;
        }
        writer.flush()?;
        info!("Final positions saved to {}", filename);
    } else {
        info!("Skipping saving final positions as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}

/// Writes the snapshots in the requested format, falling back to JSON for unknown formats.
fn save_snapshots(snapshots: &[Snapshot], base_filename: &str, format: &str) -> Result<()> {
    match format {
        "bincode" => {
            let filename = format!("{}_snapshots.bin", base_filename);
            let file = File::create(&filename).with_context(|| format!("Failed to create '{}'", filename))?;
            bincode::serialize_into(file, snapshots).context("Failed to serialize snapshots to bincode")?;
            info!("All snapshots saved to {} (binary format)", filename);
        }
        "messagepack" => {
            let filename = format!("{}_snapshots.msgpack", base_filename);
            let mut file = File::create(&filename).with_context(|| format!("Failed to create '{}'", filename))?;
            rmp_serde::encode::write(&mut file, snapshots)
                .context("Failed to serialize snapshots to MessagePack")?;
            info!("All snapshots saved to {} (MessagePack format)", filename);
        }
        other => {
            if other != "json" {
                error!("Unknown output format: {}. Using JSON instead.", other);
            }
            let filename = format!("{}_snapshots.json", base_filename);
            let mut file = File::create(&filename).with_context(|| format!("Failed to create '{}'", filename))?;
            let json_string = serde_json::to_string(snapshots).context("Failed to serialize snapshots to JSON")?;
            file.write_all(json_string.as_bytes())
                .with_context(|| format!("Failed to write '{}'", filename))?;
            info!("All snapshots saved to {} ({} KB)", filename, json_string.len() / 1024);
        }
    }
    Ok(())
}
