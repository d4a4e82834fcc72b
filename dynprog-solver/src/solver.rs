//! The scheduler interface

use std::fmt;
use std::thread;

use crate::label::SolverLabel;
use crate::partition::Partition;
use crate::problem::{DependencyPattern, Dimensions, Table};
use crate::worker::SolveReport;

/// Worker count used when none is configured: the available parallelism.
pub fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// A strategy for filling a [`Table`] with one or more workers.
///
/// Configuration (worker count, block sizes, affinity) is fixed at
/// construction; `Display` prints the identity string returned by
/// [`label`](Solver::label).
pub trait Solver: Send + Sync + fmt::Display {
    fn label(&self) -> SolverLabel;

    /// Number of worker threads a solve uses
    fn workers(&self) -> usize;

    /// Whether this solver's partitioning respects `pattern`'s dependencies.
    fn supports(&self, pattern: DependencyPattern) -> bool;

    /// Blocks each worker fills for a table of size `dims`, in fill order.
    fn partition(&self, dims: Dimensions) -> Partition;

    /// Computes every cell of `table` and returns once all workers are done.
    ///
    /// Does nothing on an already solved table.
    ///
    /// # Panics
    ///
    /// Panics if the table's dependency pattern is not supported, and
    /// re-raises any panic of the table's `compute` on a worker.
    fn solve(&self, table: &mut dyn Table) -> SolveReport;
}

/// Panics unless `solver` can fill tables shaped like `table`.
pub(crate) fn assert_supported(solver: &dyn Solver, table: &dyn Table) {
    let pattern = table.pattern();
    assert!(
        solver.supports(pattern),
        "{solver} cannot fill {pattern} tables"
    );
}
