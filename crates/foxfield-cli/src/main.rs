use anyhow::Context;
use clap::Parser;
use foxfield_core::{SimConfig, Simulator};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Run a predator-prey field simulation and report population counts.
#[derive(Parser, Debug)]
#[command(name = "foxfield", version, about)]
struct Args {
    /// Number of simulation steps to run.
    #[arg(long, default_value_t = 500)]
    steps: usize,

    /// Collect and print metrics every N steps.
    #[arg(long, default_value_t = 10)]
    sample_every: usize,

    /// Field depth (rows).
    #[arg(long, default_value_t = 80)]
    depth: usize,

    /// Field width (columns).
    #[arg(long, default_value_t = 120)]
    width: usize,

    /// Seed for the deterministic random source.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Per-cell probability of seeding a rabbit.
    #[arg(long, default_value_t = 0.08)]
    rabbit_probability: f64,

    /// Per-cell probability of seeding a fox.
    #[arg(long, default_value_t = 0.02)]
    fox_probability: f64,

    /// Per-cell probability of seeding a bear.
    #[arg(long, default_value_t = 0.01)]
    bear_probability: f64,

    /// Write the JSON run summary to this file.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = SimConfig {
        seed: args.seed,
        depth: args.depth,
        width: args.width,
        rabbit_creation_probability: args.rabbit_probability,
        fox_creation_probability: args.fox_probability,
        bear_creation_probability: args.bear_probability,
    };

    let mut sim = Simulator::try_new(config).context("invalid simulation configuration")?;
    sim.populate();
    let initial = sim.population_stats();
    println!(
        "seeded {} animals ({} rabbits, {} foxes, {} bears) on a {}x{} field",
        initial.alive_count,
        initial.rabbit_count,
        initial.fox_count,
        initial.bear_count,
        args.depth,
        args.width,
    );

    let summary = sim
        .try_run_experiment(args.steps, args.sample_every)
        .context("experiment parameters out of range")?;

    for metrics in &summary.samples {
        println!(
            "step {:6}  rabbits {:5}  foxes {:4}  bears {:4}  births {:4}  deaths {:4}",
            metrics.step,
            metrics.rabbit_count,
            metrics.fox_count,
            metrics.bear_count,
            metrics.birth_count,
            metrics.death_count,
        );
    }

    let final_stats = sim.population_stats();
    println!(
        "after {} steps: {} alive, {} births, {} deaths, viable: {}",
        summary.steps,
        final_stats.alive_count,
        summary.total_births,
        summary.total_deaths,
        final_stats.is_viable(),
    );

    if let Some(path) = args.output {
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary)
            .context("failed to serialize run summary")?;
        println!("wrote run summary to {}", path.display());
    }

    Ok(())
}
