//! Society simulation runner
//!
//! Runs a seeded society for a number of ticks, writing periodic snapshots,
//! a JSONL event log, and optionally a save document. With `--live` the run
//! goes through the live driver and every pushed snapshot is printed.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use society_core::config::DEFAULT_TUNING_PATH;
use society_core::events::EventLogger;
use society_core::interventions::{apply_interventions, INTERVENTIONS_DIR};
use society_core::output::{write_current_state, write_snapshot_to_dir, SnapshotSchedule};
use society_core::{LiveDriver, Result, SocietyConfig, SocietyController, World};
use society_events::WorldSnapshot;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "society_sim")]
#[command(about = "A multi-agent society simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of agents in the founding population
    #[arg(long)]
    agents: Option<usize>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Interval between world snapshots (in ticks)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Tuning file
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    config: PathBuf,

    /// Directory for snapshots and the event log
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Directory scanned for intervention files between ticks
    #[arg(long, default_value = INTERVENTIONS_DIR)]
    interventions: PathBuf,

    /// Resume from a save document
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a save document when the run ends
    #[arg(long)]
    save: Option<PathBuf>,

    /// Drive the run at the configured cadence and print each pushed snapshot
    #[arg(long)]
    live: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!(error = %e, "simulation failed");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = SocietyConfig::load_or_default(&args.config);
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(agents) = args.agents {
        config.simulation.initial_agents = agents;
    }
    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    if let Some(interval) = args.snapshot_interval {
        config.simulation.snapshot_interval = interval;
    }

    info!(
        seed = config.simulation.seed,
        agents = config.simulation.initial_agents,
        ticks = config.simulation.ticks,
        snapshot_interval = config.simulation.snapshot_interval,
        "starting society simulation"
    );

    fs::create_dir_all(args.output.join("snapshots"))?;
    let logger = EventLogger::new(args.output.join("events.jsonl"))?;

    let ticks = config.simulation.ticks;
    let cadence = Duration::from_millis(config.simulation.cadence_ms);
    let schedule = SnapshotSchedule::new(config.simulation.snapshot_interval);

    let mut controller = SocietyController::new(World::new(config)).with_event_logger(logger);
    if let Some(save) = &args.save {
        controller = controller.with_save_path(save);
    }
    if let Some(path) = &args.load {
        controller.load(Some(path.as_path()))?;
    }

    let controller = if args.live {
        run_live(controller, cadence, ticks, &args)?
    } else {
        run_batch(controller, ticks, schedule, &args)
    };

    if let Some(path) = &args.save {
        let written = controller.save(Some(path.as_path()))?;
        info!(path = %written.display(), "saved world");
    }
    Ok(())
}

fn run_batch(
    mut controller: SocietyController,
    ticks: u64,
    mut schedule: SnapshotSchedule,
    args: &Args,
) -> SocietyController {
    let start = controller.world().tick();
    write_snapshot(&controller.world().snapshot(), &mut schedule, &args.output);

    for _ in 0..ticks {
        apply_interventions(&args.interventions, &mut controller);

        let snapshot = controller.step();
        if snapshot.tick % 10 == 0 {
            info!(
                tick = snapshot.tick,
                agents = snapshot.num_agents,
                artifacts = snapshot.culture.len(),
                rules = snapshot.rules.len(),
                "progress"
            );
        }
        if schedule.should_snapshot(snapshot.tick) {
            write_snapshot(&snapshot, &mut schedule, &args.output);
        }
    }

    let last = controller.world().snapshot();
    if schedule.last_snapshot_tick() != Some(last.tick) {
        write_snapshot(&last, &mut schedule, &args.output);
    }
    controller.flush_events();

    info!(
        ticks = last.tick - start,
        agents = last.num_agents,
        snapshots = schedule.snapshot_count(),
        events = controller.event_count(),
        "simulation complete"
    );
    controller
}

fn write_snapshot(snapshot: &WorldSnapshot, schedule: &mut SnapshotSchedule, output: &Path) {
    if let Err(e) = write_snapshot_to_dir(snapshot, output) {
        warn!(tick = snapshot.tick, error = %e, "could not write snapshot");
    }
    if let Err(e) = write_current_state(snapshot, output) {
        warn!(tick = snapshot.tick, error = %e, "could not write current state");
    }
    schedule.mark_snapshot(snapshot.tick);
}

fn run_live(
    controller: SocietyController,
    cadence: Duration,
    ticks: u64,
    args: &Args,
) -> Result<SocietyController> {
    let runtime = tokio::runtime::Runtime::new()?;
    let threshold = controller.world().config().culture.trending_threshold;
    let shared = Arc::new(Mutex::new(controller));

    let driver = LiveDriver::new(Arc::clone(&shared), cadence)
        .with_tick_limit(ticks)
        .with_interventions(&args.interventions);
    let mut snapshots = driver.subscribe();
    let output = args.output.clone();

    runtime.block_on(async move {
        let handle = tokio::spawn(driver.run());
        loop {
            match snapshots.recv().await {
                Ok(snapshot) => {
                    println!(
                        "[tick {:>5}] agents {:>3}  artifacts {:>3}  trending {:>2}  rules {:>3}",
                        snapshot.tick,
                        snapshot.num_agents,
                        snapshot.culture.len(),
                        snapshot.trending(threshold).len(),
                        snapshot.rules.len()
                    );
                    if let Err(e) = write_current_state(&snapshot, &output) {
                        warn!(error = %e, "could not write current state");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "live output fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        match handle.await {
            Ok(summary) => info!(ticks = summary.ticks, reason = ?summary.reason, "live run finished"),
            Err(e) => warn!(error = %e, "live driver task failed"),
        }
    });

    // The driver task has finished, so this is the only reference left
    match Arc::try_unwrap(shared) {
        Ok(mutex) => Ok(mutex.into_inner()),
        Err(_) => Err(society_core::SocietyError::MalformedState(
            "live controller still shared after the driver stopped".to_string(),
        )),
    }
}
