use std::thread;

use crate::affinity::AffinityPolicy;
use crate::error::SolverError;
use crate::label::{BlockSize, SolverLabel};
use crate::partition::Block;
use crate::problem::{DependencyPattern, Dimensions};
use crate::registry::SolverPlugin;
use crate::solver::{Solver, default_workers};
use crate::worker::WorkerReport;

use super::{FillContext, FillStrategy, Frontier, owned_rows};

/// Spins, yielding the CPU, until each cell is computable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpinPerCell;

impl FillStrategy for SpinPerCell {
    const NAME: &'static str = "CellCheck";

    fn sizes(&self) -> Vec<BlockSize> {
        Vec::new()
    }

    fn blocks(&self, dims: Dimensions, worker: usize, workers: usize) -> impl Iterator<Item = Block> {
        owned_rows(dims, worker, workers).map(move |row| Block::row_segment(row, 0..dims.cols))
    }

    fn fill(&self, ctx: &FillContext<'_>, block: &Block, report: &mut WorkerReport) {
        for cell in block.cells() {
            while !ctx.table.is_computable(cell) {
                ctx.gates.check_aborted();
                thread::yield_now();
                report.waits += 1;
            }
            ctx.compute(cell, report);
        }
    }
}

/// Per-cell busy-wait. Burns a core per waiting worker; kept as a baseline.
pub type CellCheck = Frontier<SpinPerCell>;

impl Frontier<SpinPerCell> {
    pub fn new(workers: usize) -> Self {
        Self::with_strategy(workers, SpinPerCell)
    }
}

impl Default for Frontier<SpinPerCell> {
    fn default() -> Self {
        Self::new(default_workers())
    }
}

fn build(label: &SolverLabel, affinity: AffinityPolicy) -> Result<Box<dyn Solver>, SolverError> {
    Ok(Box::new(CellCheck::new(label.workers).with_affinity(affinity)))
}

inventory::submit! {
    SolverPlugin {
        name: SpinPerCell::NAME,
        sizes: 0,
        patterns: &[DependencyPattern::LeftUp, DependencyPattern::UpperRow],
        deprecated: true,
        summary: "interleaved rows, yield-spin on every cell",
        build,
    }
}
