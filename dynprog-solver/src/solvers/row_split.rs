//! Row-by-row fill with a rendezvous after every row
//!
//! Each row is cut into blocks of `k` columns dealt round-robin to the
//! workers. Nobody starts row `r + 1` before everybody finished row `r`, so
//! this only works for tables whose cells read nothing from their own row.

use std::fmt;
use std::time::Instant;

use tracing::debug;

use crate::affinity::AffinityPolicy;
use crate::barrier::RowBarrier;
use crate::error::SolverError;
use crate::label::{BlockSize, SolverLabel};
use crate::partition::{Block, Partition};
use crate::problem::{DependencyPattern, Dimensions, Table};
use crate::registry::SolverPlugin;
use crate::solver::{Solver, assert_supported, default_workers};
use crate::worker::{SolveReport, WorkerReport, run_workers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSplit {
    workers: usize,
    block: BlockSize,
    affinity: AffinityPolicy,
}

impl RowSplit {
    pub const NAME: &'static str = "RowSplit";

    /// # Panics
    ///
    /// Panics if `workers` is zero.
    pub fn new(workers: usize, block: BlockSize) -> Self {
        assert!(workers > 0, "{} needs at least one worker", Self::NAME);
        Self {
            workers,
            block,
            affinity: AffinityPolicy::default(),
        }
    }

    pub fn with_affinity(mut self, affinity: AffinityPolicy) -> Self {
        self.affinity = affinity;
        self
    }

    /// Block width for a table with `cols` columns: ⌈cols / workers⌉ by default.
    pub fn block_width(&self, cols: usize) -> usize {
        self.block.resolve(|| cols.div_ceil(self.workers))
    }

    /// Blocks of `row` owned by `worker`, left to right.
    fn row_segments(&self, cols: usize, width: usize, worker: usize, row: usize) -> impl Iterator<Item = Block> {
        (worker * width..cols)
            .step_by(self.workers * width)
            .map(move |start| Block::row_segment(row, start..(start + width).min(cols)))
    }
}

impl Default for RowSplit {
    fn default() -> Self {
        Self::new(default_workers(), BlockSize::Auto)
    }
}

impl Solver for RowSplit {
    fn label(&self) -> SolverLabel {
        SolverLabel::new(Self::NAME, self.workers, &[self.block])
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn supports(&self, pattern: DependencyPattern) -> bool {
        !pattern.reads_same_row()
    }

    fn partition(&self, dims: Dimensions) -> Partition {
        let width = self.block_width(dims.cols);
        let workers = (0..self.workers)
            .map(|worker| {
                (0..dims.rows)
                    .flat_map(|row| self.row_segments(dims.cols, width, worker, row))
                    .collect()
            })
            .collect();
        Partition::new(dims, workers)
    }

    fn solve(&self, table: &mut dyn Table) -> SolveReport {
        if table.is_solved() {
            return SolveReport::default();
        }
        assert_supported(self, table);

        let table: &dyn Table = table;
        let dims = table.dimensions();
        let width = self.block_width(dims.cols);
        let barrier = RowBarrier::new(self.workers);
        let name = self.to_string();
        let start = Instant::now();

        let report = run_workers(&name, self.workers, self.affinity, &barrier, |worker| {
            let mut report = WorkerReport::new(worker);
            for row in 0..dims.rows {
                for block in self.row_segments(dims.cols, width, worker, row) {
                    for cell in block.cells() {
                        table.compute(cell);
                        report.cells += 1;
                    }
                }
                if row + 1 < dims.rows {
                    barrier.wait();
                    report.waits += 1;
                }
            }
            report
        });

        debug!(solver = %name, %dims, width, elapsed = ?start.elapsed(), "solved");
        report
    }
}

impl fmt::Display for RowSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn build(label: &SolverLabel, affinity: AffinityPolicy) -> Result<Box<dyn Solver>, SolverError> {
    Ok(Box::new(
        RowSplit::new(label.workers, label.size(0)).with_affinity(affinity),
    ))
}

inventory::submit! {
    SolverPlugin {
        name: RowSplit::NAME,
        sizes: 1,
        patterns: &[DependencyPattern::UpperRow],
        deprecated: false,
        summary: "round-robin column blocks per row, barrier between rows",
        build,
    }
}
