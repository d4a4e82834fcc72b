//! Sequential row-major fill
//!
//! The reference every parallel solver is checked against, and the baseline
//! the benchmark compares them with. Runs on the calling thread.

use std::fmt;
use std::time::Instant;

use tracing::debug;

use crate::affinity::AffinityPolicy;
use crate::error::SolverError;
use crate::label::SolverLabel;
use crate::partition::{Block, Partition};
use crate::problem::{DependencyPattern, Dimensions, Table};
use crate::registry::SolverPlugin;
use crate::solver::Solver;
use crate::worker::{SolveReport, WorkerReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowFill {
    affinity: AffinityPolicy,
}

impl RowFill {
    pub const NAME: &'static str = "RowFill";

    pub fn new() -> Self {
        Self::default()
    }

    /// While solving, the calling thread is pinned according to `affinity`
    /// and released afterwards.
    pub fn with_affinity(mut self, affinity: AffinityPolicy) -> Self {
        self.affinity = affinity;
        self
    }

    fn whole_table(dims: Dimensions) -> Block {
        Block::new(0..dims.rows, 0..dims.cols)
    }
}

impl Solver for RowFill {
    fn label(&self) -> SolverLabel {
        SolverLabel::new(Self::NAME, 1, &[])
    }

    fn workers(&self) -> usize {
        1
    }

    fn supports(&self, _pattern: DependencyPattern) -> bool {
        true
    }

    fn partition(&self, dims: Dimensions) -> Partition {
        Partition::new(dims, vec![vec![Self::whole_table(dims)]])
    }

    fn solve(&self, table: &mut dyn Table) -> SolveReport {
        if table.is_solved() {
            return SolveReport::default();
        }
        let dims = table.dimensions();
        let start = Instant::now();

        let _pin = self.affinity.pin_worker(0);
        let mut report = WorkerReport::new(0);
        for cell in Self::whole_table(dims).cells() {
            table.compute(cell);
            report.cells += 1;
        }

        debug!(solver = %self, %dims, elapsed = ?start.elapsed(), "solved");
        SolveReport {
            workers: vec![report],
        }
    }
}

impl fmt::Display for RowFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn build(label: &SolverLabel, affinity: AffinityPolicy) -> Result<Box<dyn Solver>, SolverError> {
    if label.workers != 1 {
        return Err(SolverError::UnsupportedWorkers {
            name: label.name.clone(),
            workers: label.workers,
        });
    }
    Ok(Box::new(RowFill::new().with_affinity(affinity)))
}

inventory::submit! {
    SolverPlugin {
        name: RowFill::NAME,
        sizes: 0,
        patterns: &[DependencyPattern::LeftUp, DependencyPattern::UpperRow],
        deprecated: false,
        summary: "sequential row-major fill on the calling thread",
        build,
    }
}
