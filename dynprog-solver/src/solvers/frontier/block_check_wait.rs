use crate::affinity::AffinityPolicy;
use crate::error::SolverError;
use crate::label::{BlockSize, SolverLabel};
use crate::partition::Block;
use crate::problem::{DependencyPattern, Dimensions};
use crate::registry::SolverPlugin;
use crate::solver::{Solver, default_workers};
use crate::worker::WorkerReport;

use super::block_check_sleep::default_block_width;
use super::{FillContext, FillStrategy, Frontier, row_blocks, upper_checker};

/// Same blocks as [`SleepPerBlock`](super::SleepPerBlock), but blocks on the
/// left neighbour's gate instead of polling and signals once per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaitPerBlock {
    pub block: BlockSize,
}

impl FillStrategy for WaitPerBlock {
    const NAME: &'static str = "BlockCheckWait";

    fn sizes(&self) -> Vec<BlockSize> {
        vec![self.block]
    }

    fn blocks(&self, dims: Dimensions, worker: usize, workers: usize) -> impl Iterator<Item = Block> {
        let width = self
            .block
            .resolve(|| default_block_width(dims.cols, workers));
        row_blocks(dims, worker, workers, width)
    }

    fn fill(&self, ctx: &FillContext<'_>, block: &Block, report: &mut WorkerReport) {
        if let Some(checker) = upper_checker(ctx.dims, ctx.pattern, block) {
            ctx.wait_for_left(report, || ctx.table.is_computed(checker));
        }
        ctx.compute_block(block, report);
        ctx.signal();
    }
}

pub type BlockCheckWait = Frontier<WaitPerBlock>;

impl Frontier<WaitPerBlock> {
    pub fn new(workers: usize, block: BlockSize) -> Self {
        Self::with_strategy(workers, WaitPerBlock { block })
    }
}

impl Default for Frontier<WaitPerBlock> {
    fn default() -> Self {
        Self::new(default_workers(), BlockSize::Auto)
    }
}

fn build(label: &SolverLabel, affinity: AffinityPolicy) -> Result<Box<dyn Solver>, SolverError> {
    Ok(Box::new(
        BlockCheckWait::new(label.workers, label.size(0)).with_affinity(affinity),
    ))
}

inventory::submit! {
    SolverPlugin {
        name: WaitPerBlock::NAME,
        sizes: 1,
        patterns: &[DependencyPattern::LeftUp, DependencyPattern::UpperRow],
        deprecated: false,
        summary: "interleaved rows in column blocks, block on the left neighbour",
        build,
    }
}
