use crate::affinity::AffinityPolicy;
use crate::error::SolverError;
use crate::label::{BlockSize, SolverLabel};
use crate::partition::Block;
use crate::problem::{DependencyPattern, Dimensions};
use crate::registry::SolverPlugin;
use crate::solver::{Solver, default_workers};
use crate::worker::WorkerReport;

use super::{FillContext, FillStrategy, Frontier, owned_rows};

/// Sleeps on the left neighbour's gate until each cell is computable and
/// signals its own gate after every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaitPerCell;

impl FillStrategy for WaitPerCell {
    const NAME: &'static str = "CellCheckWait";

    fn sizes(&self) -> Vec<BlockSize> {
        Vec::new()
    }

    fn blocks(&self, dims: Dimensions, worker: usize, workers: usize) -> impl Iterator<Item = Block> {
        owned_rows(dims, worker, workers).map(move |row| Block::row_segment(row, 0..dims.cols))
    }

    fn fill(&self, ctx: &FillContext<'_>, block: &Block, report: &mut WorkerReport) {
        for cell in block.cells() {
            if !ctx.table.is_computable(cell) {
                ctx.wait_for_left(report, || ctx.table.is_computable(cell));
            }
            ctx.compute(cell, report);
            ctx.signal();
        }
    }
}

pub type CellCheckWait = Frontier<WaitPerCell>;

impl Frontier<WaitPerCell> {
    pub fn new(workers: usize) -> Self {
        Self::with_strategy(workers, WaitPerCell)
    }
}

impl Default for Frontier<WaitPerCell> {
    fn default() -> Self {
        Self::new(default_workers())
    }
}

fn build(label: &SolverLabel, affinity: AffinityPolicy) -> Result<Box<dyn Solver>, SolverError> {
    Ok(Box::new(CellCheckWait::new(label.workers).with_affinity(affinity)))
}

inventory::submit! {
    SolverPlugin {
        name: WaitPerCell::NAME,
        sizes: 0,
        patterns: &[DependencyPattern::LeftUp, DependencyPattern::UpperRow],
        deprecated: false,
        summary: "interleaved rows, block on the left neighbour per cell",
        build,
    }
}
