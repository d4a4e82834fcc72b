//! Error types for the benchmark harness

use std::path::PathBuf;

use thiserror::Error;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Target directory or result file could not be written
    #[error("Cannot write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Solver error
    #[error("Solver error: {0}")]
    Solver(#[from] dynprog_solver::SolverError),

    /// Registration error
    #[error("Registration error: {0}")]
    Registration(#[from] dynprog_solver::RegistrationError),

    /// Input generation error
    #[error("Input error: {0}")]
    Problem(#[from] dynprog_problems::ProblemError),

    /// Thread pool creation failed
    #[error("Thread pool creation failed: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Solutions that disagreed with the sequential fill
    #[error("{0} solution(s) differ from the sequential fill")]
    Verification(usize),
}

impl CliError {
    pub fn output(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> CliError {
        let path = path.into();
        move |source| CliError::Output { path, source }
    }
}
