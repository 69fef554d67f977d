use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use intersection_sim::simulation::{ControlMode, SimWorld};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Signalized four-way intersection simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "3600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.0166667")]
    delta: f32,

    /// Signal control strategy
    #[arg(long, value_enum, default_value_t = ControlMode::Adaptive)]
    mode: ControlMode,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Inject an emergency vehicle every N seconds of simulated time
    #[arg(long)]
    emergency_every: Option<f32>,

    /// Print the dashboard every N seconds of simulated time
    #[arg(long, default_value = "5.0")]
    report_every: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,intersection_sim=info"),
    )
    .init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation without graphics, printing the dashboard periodically
fn run_headless(cli: &Cli) -> Result<()> {
    if !(cli.delta > 0.0) {
        bail!("--delta must be positive, got {}", cli.delta);
    }
    if !(cli.report_every > 0.0) {
        bail!("--report-every must be positive, got {}", cli.report_every);
    }
    if let Some(every) = cli.emergency_every {
        if !(every > 0.0) {
            bail!("--emergency-every must be positive, got {}", every);
        }
    }

    info!("=== SIMULATION START ===");
    info!(
        "Ticks: {}, delta: {}s, mode: {}",
        cli.ticks, cli.delta, cli.mode
    );

    let mut world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(seed),
        None => SimWorld::new(),
    };
    world.set_mode(cli.mode);

    println!("Initial state:");
    world.print_summary();
    println!();

    let mut next_report = cli.report_every;
    let mut next_emergency = cli.emergency_every;
    let mut emergencies = 0;

    for tick in 1..=cli.ticks {
        if let (Some(at), Some(every)) = (next_emergency, cli.emergency_every) {
            if world.time >= at {
                let id = world.spawn_random_emergency();
                info!("Injected emergency vehicle {:?}", id.0);
                emergencies += 1;
                next_emergency = Some(at + every);
            }
        }

        world.tick(cli.delta);

        if world.time >= next_report {
            println!(
                "--- After tick {} ({:.1}s simulated time) ---",
                tick, world.time
            );
            world.print_summary();
            println!();
            next_report += cli.report_every;
        }
    }

    println!("=== Final State ===");
    world.print_summary();

    let summary = world.summary();
    info!("=== SIMULATION COMPLETE ===");
    info!("Elapsed time: {:.2}s", summary.time);
    info!("Total vehicles spawned: {}", summary.vehicles_spawned);
    info!("Total vehicles exited: {}", summary.vehicles_exited);
    info!("Emergency vehicles injected: {}", emergencies);
    info!("Active vehicles: {}", summary.total_vehicles);
    info!("Final green duration: {}s", summary.green_duration);

    Ok(())
}
