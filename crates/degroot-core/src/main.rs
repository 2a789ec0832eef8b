//! DeGroot Simulator
//!
//! Runs a belief-update scenario from a TOML configuration and prints the
//! outcome to stdout as a JSON report, JSON-lines history, per-step fractions,
//! or matrix markup. Nothing is written to disk.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use degroot_core::{
    build_report, default_config_toml, markup, step_trace, DegrootConfig, DegrootError,
    IterationConfig,
};

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "degroot")]
#[command(about = "DeGroot opinion dynamics simulator")]
struct Args {
    /// TOML configuration file (defaults to the built-in reference scenario)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Iterate until convergence or the step limit and emit a JSON report
    Run {
        /// Override the configured step limit
        #[arg(long)]
        max_steps: Option<usize>,

        /// Override the configured convergence tolerance
        #[arg(long)]
        tolerance: Option<f64>,

        /// Print the history as JSON lines instead of the report
        #[arg(long)]
        jsonl: bool,
    },
    /// Apply single steps and print the beliefs after each
    Step {
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// Print belief and trust markup for one history frame
    Show {
        /// History frame to render
        #[arg(long, default_value_t = 0)]
        step: usize,
    },
    /// Print the default configuration
    InitConfig,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("degroot=info,degroot_core=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), DegrootError> {
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Run {
            max_steps,
            tolerance,
            jsonl,
        } => {
            let limits = IterationConfig {
                max_steps: max_steps.unwrap_or(config.iteration.max_steps),
                tolerance: tolerance.unwrap_or(config.iteration.tolerance),
            };
            run_scenario(&config, &limits, jsonl)
        }
        Command::Step { count } => step_scenario(&config, count),
        Command::Show { step } => show_frame(&config, step),
        Command::InitConfig => {
            print!("{}", default_config_toml());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DegrootConfig, DegrootError> {
    match path {
        Some(path) => {
            let config = DegrootConfig::from_file(path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(DegrootConfig::default()),
    }
}

fn run_scenario(
    config: &DegrootConfig,
    limits: &IterationConfig,
    jsonl: bool,
) -> Result<(), DegrootError> {
    let mut model = config.build_model()?;
    info!(
        agents = model.agent_count(),
        max_steps = limits.max_steps,
        tolerance = limits.tolerance,
        "Starting simulation"
    );

    let run = model.iterate_with(limits)?;
    let report = build_report(&model, &run, limits, &config.display)?;

    if report.converged {
        info!("{}", report.status_line());
    } else {
        warn!("{}", report.status_line());
    }
    info!(
        "Final beliefs: {}",
        model.fraction_line(config.display.text_max_denominator)?
    );

    if jsonl {
        print!("{}", report.history_jsonl()?);
    } else {
        println!("{}", report.to_json()?);
    }
    Ok(())
}

fn step_scenario(config: &DegrootConfig, count: usize) -> Result<(), DegrootError> {
    let mut model = config.build_model()?;
    for line in step_trace(&mut model, count, &config.display)? {
        println!("{}", line);
    }
    Ok(())
}

fn show_frame(config: &DegrootConfig, step: usize) -> Result<(), DegrootError> {
    let mut model = config.build_model()?;
    let run = model.iterate_with(&config.iteration)?;

    let frame = run.frame(step).ok_or(DegrootError::FrameOutOfRange {
        step,
        frames: run.history.len(),
    })?;
    let pair = markup::render(frame, model.trust(), config.display.markup_max_denominator)?;

    println!("{}", pair.beliefs);
    println!("{}", pair.trust);
    Ok(())
}
