//! Error types for the solver library

use thiserror::Error;

use crate::problem::Cell;

/// Error type for parsing solver identity strings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// Input doesn't look like `Name[workers(,size)*]`
    #[error("Malformed solver label: {0:?}")]
    Malformed(String),
    /// A solver needs at least one worker
    #[error("Solver label {0:?} asks for zero workers")]
    ZeroWorkers(String),
    /// Sizes are positive or `-1` for the solver's default
    #[error("Invalid block size {value} in solver label {label:?}")]
    InvalidSize { label: String, value: i64 },
}

/// Error type for creating solvers from labels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// No plugin registered under this name
    #[error("Solver not found: {0}")]
    NotFound(String),
    /// More block sizes than the solver takes
    #[error("{name} takes at most {max} block sizes, got {given}")]
    TooManySizes {
        name: String,
        given: usize,
        max: usize,
    },
    /// The solver only runs with a fixed worker count
    #[error("{name} cannot run with {workers} workers")]
    UnsupportedWorkers { name: String, workers: usize },
    /// Error occurred while parsing the label
    #[error("Label error: {0}")]
    Label(#[from] LabelError),
}

/// Error type for registration failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Two plugins share one name
    #[error("Duplicate solver registration for {0}")]
    DuplicateSolver(String),
}

/// A partition that does not assign every cell to exactly one worker
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("Cell {cell} assigned to both worker {first} and worker {second}")]
    Overlap {
        cell: Cell,
        first: usize,
        second: usize,
    },
    #[error("Cell {0} not assigned to any worker")]
    Uncovered(Cell),
    #[error("Worker {worker} owns a block reaching past the table")]
    OutOfBounds { worker: usize },
}
