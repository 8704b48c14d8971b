//! `qsearch` binary: runs the Grover demonstrations.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin qsearch -- coloring
//! cargo run --bin qsearch -- isbn --seed 7
//! cargo run --bin qsearch -- --config demo.json random
//! ```

use clap::{Parser, Subcommand};
use qsearch::config::DemoConfig;
use qsearch::grover::{RetryController, SearchProblem};
use qsearch::{QsearchError, Simulator, random_number};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Command-line arguments for the demo binary.
#[derive(Parser, Debug)]
#[command(name = "qsearch", version, about = "Grover search demonstrations", long_about = None)]
struct Args {
    /// Path to a JSON configuration file.
    ///
    /// If not provided, the default `DemoConfig` is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Seed the simulator's measurement RNG (overrides the config).
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override the search attempt cap from the config.
    #[arg(long, global = true)]
    max_attempts: Option<usize>,

    /// Override the analytic Grover iteration count.
    #[arg(long, global = true)]
    iterations: Option<usize>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    demo: Demo,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Demo {
    /// Check the example coloring with the oracle, then search for a valid one.
    Coloring,
    /// Recover the missing ISBN-10 digit.
    Isbn,
    /// Sample a random number in the configured range.
    Random,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level_filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    info!("qsearch v{}", qsearch::VERSION);

    let mut config = match args.config.as_deref() {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            match DemoConfig::from_json(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    error!("Failed to load configuration: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => DemoConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.simulator.seed = Some(seed);
    }
    if let Some(max_attempts) = args.max_attempts {
        config.search.max_attempts = max_attempts;
    }
    if args.iterations.is_some() {
        config.search.iteration_override = args.iterations;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {e}");
        return ExitCode::FAILURE;
    }

    match run(args.demo, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(QsearchError::SearchExhausted { attempts }) => {
            error!("No verified solution after {attempts} attempts");
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(demo: Demo, config: &DemoConfig) -> qsearch::Result<()> {
    let mut sim = Simulator::with_config(config.simulator.clone());
    let controller = || {
        RetryController::new(config.search.max_attempts)
            .map(|c| c.with_iteration_override(config.search.iteration_override))
    };

    match demo {
        Demo::Coloring => {
            let problem = config.coloring.problem()?;
            let example = &config.coloring.example_coloring;
            let colors = problem.decode_colors(example);
            let verdict = problem.check_coloring_with_oracle(&mut sim, example)?;
            info!("Example coloring {:?} is {}", colors, if verdict { "valid" } else { "invalid" });
            if verdict != problem.is_valid_coloring(&colors) {
                warn!("Oracle verdict disagrees with the classical check");
            }

            let mut retry = controller()?;
            let iterations = retry.iterations_for(&problem)?;
            info!("Searching {} qubits with {} iterations", problem.register_len(), iterations);
            let solution = retry.search(&mut sim, &problem)?;
            info!("Found coloring {:?} after {} attempt(s)", solution.value, solution.attempts);
            println!("{:?}", solution.value);
        }
        Demo::Isbn => {
            let problem = config.isbn.problem()?;
            let constants = problem.constants();
            info!(
                "Solving ({} + {}*x) mod 11 = 0 for the digit at position {}",
                constants.b, constants.a, constants.missing_index
            );
            let solution = controller()?.search(&mut sim, &problem)?;
            info!(
                "Missing digit is {} (found after {} attempt(s))",
                solution.value, solution.attempts
            );
            if let Some(full) = problem.complete(solution.value) {
                let isbn: String = full.iter().map(|d| d.to_string()).collect();
                println!("{}", isbn);
            }
        }
        Demo::Random => {
            let value = random_number(&mut sim, config.random.min, config.random.max)?;
            info!("Sampled {} from [{}, {}]", value, config.random.min, config.random.max);
            println!("{}", value);
        }
    }
    Ok(())
}
