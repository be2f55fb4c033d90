//! `anneal`: run one annealing schedule on an Ising problem file.
//!
//! ```text
//! anneal problem.txt --engine multispin --sweeps 20 --start 3 --end 0.05 --steps 100
//! anneal problem.txt --config run.json --json
//! ```

use std::path::PathBuf;

use anneal_sim::graph::read_problem;
use anneal_sim::{
    random_spins, run_anneal, AnnealConfig, AnnealReport, Engine, QuantumConfig, Schedule,
    ScheduleKind,
};
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Simulated and path-integral quantum annealing of Ising models
#[derive(Parser)]
#[command(name = "anneal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Problem file with one `i j J` interaction per line
    problem: PathBuf,

    /// JSON run configuration; overrides the engine and schedule flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Engine (sequential, parallel, multispin, quantum)
    #[arg(short, long, default_value = "sequential", value_parser = parse_engine)]
    engine: Engine,

    /// Sweeps per schedule value
    #[arg(short, long, default_value = "10")]
    sweeps: usize,

    /// Schedule shape (linear, geometric)
    #[arg(long, default_value = "geometric", value_parser = parse_schedule_kind)]
    schedule: ScheduleKind,

    /// First schedule value (temperature, or transverse field for quantum)
    #[arg(long, default_value = "3.0")]
    start: f32,

    /// Last schedule value
    #[arg(long, default_value = "0.05")]
    end: f32,

    /// Number of schedule values
    #[arg(long, default_value = "100")]
    steps: usize,

    /// Worker threads for the parallel engine
    #[arg(short, long)]
    workers: Option<usize>,

    /// Trotter slices for the quantum engine
    #[arg(long, default_value = "16")]
    slices: usize,

    /// Fixed temperature for the quantum engine
    #[arg(long, default_value = "0.05")]
    temperature: f32,

    /// RNG seed; random when omitted
    #[arg(long, env = "ANNEAL_SEED")]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_engine(s: &str) -> Result<Engine, String> {
    Engine::try_from(s)
}

fn parse_schedule_kind(s: &str) -> Result<ScheduleKind, String> {
    ScheduleKind::try_from(s)
}

impl Cli {
    fn anneal_config(&self) -> Result<AnnealConfig> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            return serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()));
        }
        Ok(AnnealConfig {
            engine: self.engine,
            sweeps: self.sweeps,
            schedule: Schedule {
                kind: self.schedule,
                start: self.start,
                end: self.end,
                steps: self.steps,
            },
            n_workers: self.workers,
            quantum: (self.engine == Engine::Quantum).then_some(QuantumConfig {
                n_slices: self.slices,
                temperature: self.temperature,
            }),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.anneal_config()?;
    let graph = read_problem(&cli.problem)
        .with_context(|| format!("loading problem {}", cli.problem.display()))?;

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, problem = %cli.problem.display(), "seeded");
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let mut spins = random_spins(config.n_systems(), graph.n_spins(), &mut rng);

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(config.schedule.steps as u64)
    };
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )
        .context("progress bar template")?
        .progress_chars("=> "),
    );
    pb.set_message(format!("{:?}", config.engine).to_lowercase());

    let report = run_anneal(&config, &graph, &mut spins, &mut rng, &|| pb.inc(1))?;
    pb.finish_and_clear();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &spins);
    }
    Ok(())
}

fn print_report(report: &AnnealReport, spins: &[i8]) {
    println!(
        "engine: {:?}  |  spins: {}  |  steps: {}  |  sweeps: {}",
        report.engine, report.n_spins, report.steps, report.sweeps
    );
    println!(
        "best energy: {:.6} (system {} of {})",
        report.best_energy,
        report.best_system,
        report.energies.len()
    );
    let n = report.n_spins;
    let best = &spins[report.best_system * n..(report.best_system + 1) * n];
    let line: Vec<&str> = best
        .iter()
        .map(|&s| if s > 0 { "+" } else { "-" })
        .collect();
    println!("configuration: {}", line.concat());
}
