//! dynprog-bench - times every wavefront scheduler on generated DP tables

mod cli;
mod config;
mod error;
mod executor;
mod meta;
mod output;
mod profiler;
mod suite;
mod workload;

use clap::Parser;
use cli::Args;
use config::Config;
use dynprog_solver::SolverRegistry;
use executor::Executor;
use output::Progress;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), error::CliError> {
    let config = Config::from_args(args)?;
    let registry = SolverRegistry::with_all_plugins()?;
    let progress = Progress::new(config.quiet);

    let mut executor = Executor::new(&registry, config.clone())?;
    progress.print_setup(
        &config.target_dir,
        config.processors,
        executor.solvers().count(),
        executor.seed(),
    );
    progress.print_start(
        config.sizes.len(),
        config.inputs_per_size,
        config.runs_per_input,
    );

    let summary = executor.execute(&progress)?;
    progress.print_summary(&summary);
    Ok(())
}
