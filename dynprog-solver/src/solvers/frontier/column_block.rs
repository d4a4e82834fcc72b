use crate::affinity::AffinityPolicy;
use crate::error::SolverError;
use crate::label::{BlockSize, SolverLabel};
use crate::partition::Block;
use crate::problem::{Cell, DependencyPattern, Dimensions};
use crate::registry::SolverPlugin;
use crate::solver::{Solver, default_workers};
use crate::worker::WorkerReport;

use super::{FillContext, FillStrategy, Frontier};

/// Vertical bands of `width` columns dealt round-robin to the workers, each
/// filled top to bottom in row blocks of `height` rows.
///
/// Before a row block in any band but the first, the worker waits until the
/// band to its left has finished the same rows. Cells must not read from
/// the right (`(i-1, j+1)`), or neighbouring bands would wait on each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnBands {
    pub width: BlockSize,
    pub height: BlockSize,
}

impl ColumnBands {
    /// Band width and row block height for `dims`: ⌈cols / workers⌉ and
    /// ⌈rows / workers⌉ by default.
    pub fn resolve(&self, dims: Dimensions, workers: usize) -> (usize, usize) {
        (
            self.width.resolve(|| dims.cols.div_ceil(workers)),
            self.height.resolve(|| dims.rows.div_ceil(workers)),
        )
    }
}

impl FillStrategy for ColumnBands {
    const NAME: &'static str = "ColumnBlock";

    fn sizes(&self) -> Vec<BlockSize> {
        vec![self.width, self.height]
    }

    fn supports(&self, pattern: DependencyPattern) -> bool {
        pattern.upper_reach() == 0
    }

    fn blocks(&self, dims: Dimensions, worker: usize, workers: usize) -> impl Iterator<Item = Block> {
        let (width, height) = self.resolve(dims, workers);
        (worker * width..dims.cols)
            .step_by(workers * width)
            .flat_map(move |left| {
                let cols = left..(left + width).min(dims.cols);
                (0..dims.rows)
                    .step_by(height)
                    .map(move |top| Block::new(top..(top + height).min(dims.rows), cols.clone()))
            })
    }

    fn fill(&self, ctx: &FillContext<'_>, block: &Block, report: &mut WorkerReport) {
        if let Some(left) = block.cols.start.checked_sub(1) {
            let checker = Cell::new(block.rows.end - 1, left);
            ctx.wait_for_left(report, || ctx.table.is_computed(checker));
        }
        ctx.compute_block(block, report);
        ctx.signal();
    }
}

pub type ColumnBlock = Frontier<ColumnBands>;

impl Frontier<ColumnBands> {
    pub fn new(workers: usize, width: BlockSize, height: BlockSize) -> Self {
        Self::with_strategy(workers, ColumnBands { width, height })
    }
}

impl Default for Frontier<ColumnBands> {
    fn default() -> Self {
        Self::new(default_workers(), BlockSize::Auto, BlockSize::Auto)
    }
}

fn build(label: &SolverLabel, affinity: AffinityPolicy) -> Result<Box<dyn Solver>, SolverError> {
    Ok(Box::new(
        ColumnBlock::new(label.workers, label.size(0), label.size(1)).with_affinity(affinity),
    ))
}

inventory::submit! {
    SolverPlugin {
        name: ColumnBands::NAME,
        sizes: 2,
        patterns: &[DependencyPattern::LeftUp],
        deprecated: false,
        summary: "round-robin column bands in row blocks, block on the band to the left",
        build,
    }
}
