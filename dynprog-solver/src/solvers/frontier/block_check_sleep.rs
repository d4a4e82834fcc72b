use std::thread;
use std::time::Duration;

use crate::affinity::AffinityPolicy;
use crate::error::SolverError;
use crate::label::{BlockSize, SolverLabel};
use crate::partition::Block;
use crate::problem::{DependencyPattern, Dimensions};
use crate::registry::SolverPlugin;
use crate::solver::{Solver, default_workers};
use crate::worker::WorkerReport;

use super::{FillContext, FillStrategy, Frontier, row_blocks, upper_checker};

/// Poll interval while the row above is not far enough yet
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Default width of a row block: ⌈cols / (workers + 1)⌉ + 1.
pub(crate) fn default_block_width(cols: usize, workers: usize) -> usize {
    cols.div_ceil(workers + 1) + 1
}

/// Fills rows in blocks of `block` columns, sleeping between polls of the
/// last cell each block needs from the row above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SleepPerBlock {
    pub block: BlockSize,
}

impl FillStrategy for SleepPerBlock {
    const NAME: &'static str = "BlockCheckSleep";

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
            while !ctx.table.is_computed(checker) {
                ctx.gates.check_aborted();
                thread::sleep(POLL_INTERVAL);
                report.waits += 1;
            }
        }
        ctx.compute_block(block, report);
    }
}

pub type BlockCheckSleep = Frontier<SleepPerBlock>;

impl Frontier<SleepPerBlock> {
    pub fn new(workers: usize, block: BlockSize) -> Self {
        Self::with_strategy(workers, SleepPerBlock { block })
    }
}

impl Default for Frontier<SleepPerBlock> {
    fn default() -> Self {
        Self::new(default_workers(), BlockSize::Auto)
    }
}

fn build(label: &SolverLabel, affinity: AffinityPolicy) -> Result<Box<dyn Solver>, SolverError> {
    Ok(Box::new(
        BlockCheckSleep::new(label.workers, label.size(0)).with_affinity(affinity),
    ))
}

inventory::submit! {
    SolverPlugin {
        name: SleepPerBlock::NAME,
        sizes: 1,
        patterns: &[DependencyPattern::LeftUp, DependencyPattern::UpperRow],
        deprecated: false,
        summary: "interleaved rows in column blocks, timed poll on the row above",
        build,
    }
}
