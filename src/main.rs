//! Mellifera - headless colony runner
//!
//! Drives the simulation for a fixed number of cycles, acting as a minimal
//! autopilot for the operations an input layer would normally trigger
//! (pioneer flights toward undiscovered nodes), and writes a JSON report.

use clap::Parser;
use mellifera::core::clock::ClockEvent;
use mellifera::core::config::SimulationConfig;
use mellifera::core::error::Result;
use mellifera::simulation::events::SimEvent;
use mellifera::simulation::session::Simulation;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mellifera", about = "Bee colony simulation engine")]
struct Args {
    /// RNG seed for a reproducible run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of cycles to simulate
    #[arg(long, default_value_t = 10)]
    cycles: u32,

    /// Fixed tick step in seconds
    #[arg(long, default_value_t = 0.5)]
    step: f32,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path for the JSON report
    #[arg(long, default_value = "simulation_output.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mellifera=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    println!("Mellifera colony simulation");
    println!("===========================");
    println!(
        "Map: {} honey / {} pollen nodes, {} hazards",
        config.honey_node_count,
        config.pollen_node_count,
        config.spider_count + config.wind_count
    );
    println!(
        "Colony: {} workers, {} queens",
        config.starting_workers, config.starting_queens
    );
    println!("Simulating {} cycles (seed {})...", args.cycles, args.seed);
    println!();

    let mut sim = Simulation::new(config, args.seed)?;
    let target_cycle = sim.clock().cycle() + args.cycles;

    while sim.clock().cycle() < target_cycle {
        autopilot(&mut sim);

        let events = sim.tick(args.step);
        for event in &events {
            if let SimEvent::Clock(ClockEvent::CycleEnd(cycle)) = event {
                let s = sim.summary();
                println!(
                    "cycle {:>3} [{:?}]  bees {:>3}  brood {:>2}  honey {:>6.1}  pollen {:>6.1}  \
                     wax {:>5.1}  jelly {:>5.1}  routes {}",
                    cycle,
                    s.season,
                    s.workers + s.queens,
                    s.broods,
                    s.honey,
                    s.pollen,
                    s.beeswax,
                    s.royal_jelly,
                    s.routes,
                );
            }
        }
    }

    let summary = sim.summary();
    let json = serde_json::to_string_pretty(&summary)?;
    std::fs::write(&args.output, &json)?;

    println!();
    println!("--- Final state ---");
    println!(
        "Population: {} workers, {} queens, {} brood",
        summary.workers, summary.queens, summary.broods
    );
    println!(
        "Stores: {:.1} honey, {:.1} pollen, {:.1} beeswax, {:.1} royal jelly",
        summary.honey, summary.pollen, summary.beeswax, summary.royal_jelly
    );
    println!(
        "Foraging: {} of {} nodes discovered, {} routes",
        summary.discovered_nodes,
        sim.foraging().nodes().len(),
        summary.routes
    );
    println!(
        "Tasks: {} on the board, {} completed",
        summary.tasks_total, summary.tasks_completed
    );
    println!("\nReport written to {}", args.output.display());

    Ok(())
}

/// Stand-in for the input layer: send an idle worker pioneering whenever
/// there are undiscovered nodes and no flight in progress
fn autopilot(sim: &mut Simulation) {
    if sim.foraging().is_pioneer_active() || !sim.clock().can_forage() {
        return;
    }
    let Some(&node) = sim.foraging().undiscovered_nodes().first() else {
        return;
    };
    let target = match sim.foraging().get_node(node) {
        Some(n) => n.position,
        None => return,
    };
    let Some(bee) = sim.population().idle_workers().first().copied() else {
        return;
    };

    if sim.start_pioneer(bee) {
        sim.set_pioneer_target(target);
    }
}
