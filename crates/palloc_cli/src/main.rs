//! Command-line front-end for the parking allocation simulator: parses
//! flags, loads the environment, runs the Monte Carlo driver, and reports
//! results to stdout and, optionally, a file.

mod start_time;

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use palloc_core::driver::run_monte_carlo;
use palloc_core::environment::Environment;
use palloc_core::error::PallocError;
use palloc_core::settings::{GeneralSettings, OutputSettings, SimulatorSettings};

use start_time::parse_start_time;

#[derive(Parser)]
#[command(
    name = "palloc",
    about = "Monte Carlo simulator for capacitated parking dispatch"
)]
struct Cli {
    /// Path to the environment JSON file
    #[arg(short = 'e', long)]
    environment: String,

    /// Minutes to simulate
    #[arg(short = 't', long)]
    timesteps: u32,

    /// Start of day, "HH:MM"
    #[arg(short = 'S', long, default_value = "00:00")]
    start_time: String,

    /// Maximum request duration in minutes
    #[arg(short = 'd', long, default_value_t = 1440)]
    duration: u32,

    /// Maximum minutes a request may arrive early
    #[arg(short = 'A', long, default_value_t = 0)]
    arrival: u32,

    /// Scheduler feasibility slack, minutes
    #[arg(short = 'm', long, default_value_t = 0)]
    minimum_parking_time: u32,

    /// Request arrival rate (lambda)
    #[arg(short = 'r', long, default_value_t = 1.0)]
    request_rate: f64,

    /// Minutes between solver calls
    #[arg(short = 'b', long, default_value_t = 15)]
    batch_interval: u32,

    /// A request is committable only when `till_arrival <= this`
    #[arg(short = 'c', long, default_value_t = 0)]
    commit_interval: u32,

    /// Toggle per-parking weighted cost
    #[arg(short = 'w', long, default_value_t = false)]
    weighted_parking: bool,

    /// Random generator: "pcg" or "pcg-fast"
    #[arg(short = 'g', long, default_value = "pcg")]
    random_generator: String,

    /// Seed; defaults to wall-clock nanoseconds
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Optional output path for the aggregated result JSON
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Emit the full per-timestep trace
    #[arg(short = 'T', long, default_value_t = false)]
    trace: bool,

    /// Pretty-print the output JSON
    #[arg(short = 'p', long, default_value_t = false)]
    prettify: bool,

    /// Number of independent runs to aggregate
    #[arg(short = 'a', long, default_value_t = 1)]
    aggregate: u32,

    /// Worker thread count; defaults to min(available_parallelism, aggregate)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

fn default_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run(cli: Cli) -> Result<(), PallocError> {
    let start_time = parse_start_time(&cli.start_time)?;
    let seed = cli.seed.unwrap_or_else(default_seed);

    let settings = SimulatorSettings {
        timesteps: cli.timesteps,
        start_time,
        max_request_duration: cli.duration,
        max_time_till_arrival: cli.arrival,
        minimum_parking_time: cli.minimum_parking_time,
        request_rate: cli.request_rate,
        batch_interval: cli.batch_interval,
        commit_interval: cli.commit_interval,
        weighted_parking: cli.weighted_parking,
        random_generator: cli.random_generator,
        seed,
    };
    settings.validate()?;

    let output = OutputSettings {
        output_path: cli.output.clone(),
        number_of_runs_to_aggregate: cli.aggregate,
        prettify: cli.prettify,
        output_trace: cli.trace,
    };
    output.validate()?;

    let general = GeneralSettings {
        number_of_threads: cli.jobs,
    };

    let env = Environment::load(&cli.environment)?;

    let aggregated = run_monte_carlo(&env, &settings, &output, &general)?;

    println!(
        "runs={} generated={} scheduled={} unassigned={} dropped={} avg_cost={:.3} avg_duration={:.3} elapsed={:.3}s",
        cli.aggregate,
        aggregated.requests_generated,
        aggregated.requests_scheduled,
        aggregated.requests_unassigned,
        aggregated.total_dropped_requests,
        aggregated.avg_cost,
        aggregated.avg_duration,
        aggregated.time_elapsed,
    );

    if let Some(path) = &output.output_path {
        let text = if output.prettify {
            serde_json::to_string_pretty(&aggregated)
        } else {
            serde_json::to_string(&aggregated)
        }
        .expect("aggregated result serializes");

        fs::write(path, text).map_err(|source| PallocError::Io {
            path: path.clone(),
            source,
        })?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
