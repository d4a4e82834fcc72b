//! Diagonal-frontier solvers
//!
//! One driver, [`Frontier`], spawns the workers and walks each worker's
//! blocks; a [`FillStrategy`] decides which blocks a worker owns and how it
//! waits for its dependencies before filling one. Except for
//! [`ColumnBlock`], worker `w` owns the rows `r ≡ w (mod p)`, so the rows
//! above its own always belong to its left neighbour `(w - 1) mod p` and the
//! computation advances as a staircase-shaped wavefront.
//!
//! Waiting strategies block on the left neighbour's gate; every strategy
//! signals its own gate after publishing progress.

mod block_check_sleep;
mod block_check_wait;
mod cell_check;
mod cell_check_wait;
mod column_block;

use std::fmt;
use std::time::Instant;

use tracing::debug;

use crate::affinity::AffinityPolicy;
use crate::gate::GateArray;
use crate::label::{BlockSize, SolverLabel};
use crate::partition::{Block, Partition};
use crate::problem::{Cell, DependencyPattern, Dimensions, Table};
use crate::solver::{Solver, assert_supported};
use crate::worker::{SolveReport, WorkerReport, run_workers};

pub use block_check_sleep::{BlockCheckSleep, SleepPerBlock};
pub use block_check_wait::{BlockCheckWait, WaitPerBlock};
pub use cell_check::{CellCheck, SpinPerCell};
pub use cell_check_wait::{CellCheckWait, WaitPerCell};
pub use column_block::{ColumnBands, ColumnBlock};

/// How a frontier worker claims and fills its share of the table.
pub trait FillStrategy: fmt::Debug + Send + Sync {
    /// Solver name used in identity strings
    const NAME: &'static str;

    /// Configured block sizes, in label order
    fn sizes(&self) -> Vec<BlockSize>;

    fn supports(&self, _pattern: DependencyPattern) -> bool {
        true
    }

    /// Blocks `worker` fills, in order.
    fn blocks(&self, dims: Dimensions, worker: usize, workers: usize) -> impl Iterator<Item = Block>;

    /// Waits until `block` can be filled, then fills it.
    fn fill(&self, ctx: &FillContext<'_>, block: &Block, report: &mut WorkerReport);
}

/// What one worker sees while filling.
#[derive(Clone, Copy)]
pub struct FillContext<'a> {
    pub table: &'a dyn Table,
    pub dims: Dimensions,
    pub pattern: DependencyPattern,
    pub worker: usize,
    pub workers: usize,
    pub gates: &'a GateArray,
}

impl FillContext<'_> {
    /// Worker that owns the rows (or band) this worker depends on.
    pub fn left_neighbour(&self) -> usize {
        (self.worker + self.workers - 1) % self.workers
    }

    /// Blocks on the left neighbour's gate until `ready` holds.
    pub fn wait_for_left(&self, report: &mut WorkerReport, ready: impl FnMut() -> bool) {
        report.waits += self.gates.wait_until(self.left_neighbour(), ready);
    }

    /// Wakes whoever waits on this worker.
    pub fn signal(&self) {
        self.gates.signal(self.worker);
    }

    pub fn compute(&self, cell: Cell, report: &mut WorkerReport) {
        self.table.compute(cell);
        report.cells += 1;
    }

    pub fn compute_block(&self, block: &Block, report: &mut WorkerReport) {
        for cell in block.cells() {
            self.compute(cell, report);
        }
    }
}

impl fmt::Debug for FillContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillContext")
            .field("dims", &self.dims)
            .field("pattern", &self.pattern)
            .field("worker", &self.worker)
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

/// Rows `worker` owns: `worker, worker + p, worker + 2p, …`
pub(crate) fn owned_rows(dims: Dimensions, worker: usize, workers: usize) -> impl Iterator<Item = usize> {
    (worker..dims.rows).step_by(workers)
}

/// Owned rows cut into blocks of `width` columns.
pub(crate) fn row_blocks(
    dims: Dimensions,
    worker: usize,
    workers: usize,
    width: usize,
) -> impl Iterator<Item = Block> {
    owned_rows(dims, worker, workers).flat_map(move |row| {
        (0..dims.cols)
            .step_by(width)
            .map(move |start| Block::row_segment(row, start..(start + width).min(dims.cols)))
    })
}

/// Last cell of the row above that `block` depends on, `None` in row 0.
///
/// The owner fills that row left to right, so once this cell is computed
/// every dependency of `block` in the row above is too.
pub(crate) fn upper_checker(dims: Dimensions, pattern: DependencyPattern, block: &Block) -> Option<Cell> {
    let row = block.rows.start.checked_sub(1)?;
    let last = block.cols.end.checked_sub(1)?;
    Some(Cell::new(row, (last + pattern.upper_reach()).min(dims.cols - 1)))
}

/// Generic frontier solver; see the type aliases for the concrete ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontier<S> {
    workers: usize,
    strategy: S,
    affinity: AffinityPolicy,
}

impl<S: FillStrategy> Frontier<S> {
    /// # Panics
    ///
    /// Panics if `workers` is zero.
    pub fn with_strategy(workers: usize, strategy: S) -> Self {
        assert!(workers > 0, "{} needs at least one worker", S::NAME);
        Self {
            workers,
            strategy,
            affinity: AffinityPolicy::default(),
        }
    }

    pub fn with_affinity(mut self, affinity: AffinityPolicy) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl<S: FillStrategy> Solver for Frontier<S> {
    fn label(&self) -> SolverLabel {
        SolverLabel::new(S::NAME, self.workers, &self.strategy.sizes())
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn supports(&self, pattern: DependencyPattern) -> bool {
        self.strategy.supports(pattern)
    }

    fn partition(&self, dims: Dimensions) -> Partition {
        let workers = (0..self.workers)
            .map(|worker| self.strategy.blocks(dims, worker, self.workers).collect())
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
        let pattern = table.pattern();
        let gates = GateArray::new(self.workers);
        let name = self.to_string();
        let start = Instant::now();

        let report = run_workers(&name, self.workers, self.affinity, &gates, |worker| {
            let ctx = FillContext {
                table,
                dims,
                pattern,
                worker,
                workers: self.workers,
                gates: &gates,
            };
            let mut report = WorkerReport::new(worker);
            for block in self.strategy.blocks(dims, worker, self.workers) {
                self.strategy.fill(&ctx, &block, &mut report);
            }
            report
        });

        debug!(solver = %name, %dims, %pattern, elapsed = ?start.elapsed(), "solved");
        report
    }
}

impl<S: FillStrategy> fmt::Display for Frontier<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
