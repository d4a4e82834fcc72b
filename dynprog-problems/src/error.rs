//! Error types for building workloads

use thiserror::Error;

/// Error type for invalid workload inputs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// A table dimension would be zero
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),
    /// The range-sum workload needs at least one row
    #[error("At least one iteration is required")]
    NoIterations,
    /// Random lengths need a non-empty range
    #[error("Invalid length range {min}..{max}")]
    InvalidRange { min: usize, max: usize },
    /// A range-sum number large enough to overflow a running sum
    #[error("Number {value} exceeds the limit of {limit} for this many iterations")]
    ValueOutOfRange { value: i64, limit: i64 },
}
