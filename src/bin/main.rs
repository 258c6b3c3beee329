//! Precinct Simulator CLI
//!
//! Sweeps every precinct in the configured size bounds over increasing
//! station counts, and reports voter wait times for each.
//!
//! # Example
//!
//! ```bash
//! # YAML or JSON configuration
//! precinct-sim --config config.yaml --precincts precincts.txt
//!
//! # Legacy text configuration with a separate service-time file
//! precinct-sim --config config.txt --service-times dataallsorted.txt \
//!     --precincts precincts.txt --output report.txt --seed 7
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use precinct_sim::config::Configuration;
use precinct_sim::input_modeling::SeededRandom;
use precinct_sim::models::load_precincts;
use precinct_sim::simulator::{BatchSimulation, ReportSink, WriterSink};
use precinct_sim::utils::errors::SimulationError;

/// Precinct Simulator
///
/// Runs deterministic voter wait-time simulations. Single-threaded, and
/// reproducible for a fixed seed.
#[derive(Parser, Debug)]
#[command(name = "precinct-sim")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file (.yaml, .yml, .json, or legacy text with --service-times)
    #[arg(short, long)]
    config: PathBuf,

    /// Observed service durations, for a legacy text configuration
    #[arg(short, long)]
    service_times: Option<PathBuf>,

    /// Precinct records (.yaml, .yml, .json, or whitespace-separated text)
    #[arg(short, long)]
    precincts: PathBuf,

    /// Report file. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Random seed, overriding the configured seed
    #[arg(long)]
    seed: Option<u64>,

    /// Emit the configuration and precinct summaries before the report
    #[arg(long)]
    show_config: bool,
}

fn load_configuration(args: &Args) -> Result<Configuration, SimulationError> {
    let mut configuration = match &args.service_times {
        Some(service_times) => Configuration::from_legacy_paths(&args.config, service_times)?,
        None => Configuration::from_path(&args.config)?,
    };
    if let Some(seed) = args.seed {
        configuration.seed = seed;
    }
    Ok(configuration)
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let configuration = load_configuration(args)?;
    let precincts = load_precincts(&args.precincts)?;
    info!(
        seed = configuration.seed,
        precincts = precincts.len(),
        iterations = configuration.number_of_iterations,
        "Loaded inputs"
    );

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    let mut sink = WriterSink::new(writer);

    let mut random = SeededRandom::new(configuration.seed);
    let batch = BatchSimulation::post(configuration, precincts)?;
    if args.show_config {
        sink.emit(&batch.configuration().to_string())?;
        batch
            .precinct_lines()
            .iter()
            .try_for_each(|line| sink.emit(line))?;
    }
    let outcome = batch.run(&mut random, &mut sink)?;
    sink.into_inner().flush()?;

    info!(
        precincts_simulated = outcome.precincts_simulated,
        satisfied = outcome
            .precincts
            .iter()
            .filter(|precinct| precinct.is_satisfied())
            .count(),
        "Simulation complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,precinct_sim=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Simulation failed");
            ExitCode::FAILURE
        }
    }
}
