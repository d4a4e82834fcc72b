//! Static assignment of table cells to workers

use std::ops::Range;

use crate::error::PartitionError;
use crate::problem::{Cell, Dimensions};

/// Rectangular run of cells, filled row by row, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Block {
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    /// Block covering columns `cols` of a single row.
    pub fn row_segment(row: usize, cols: Range<usize>) -> Self {
        Self::new(row..row + 1, cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    /// Cells in fill order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.rows
            .clone()
            .flat_map(move |row| self.cols.clone().map(move |col| Cell::new(row, col)))
    }

    /// Last cell in fill order, `None` for an empty block.
    #[cfg(test)]
    fn last_cell(&self) -> Option<Cell> {
        (!self.is_empty()).then(|| Cell::new(self.rows.end - 1, self.cols.end - 1))
    }
}

/// Blocks per worker, in the order each worker fills them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    dims: Dimensions,
    workers: Vec<Vec<Block>>,
}

impl Partition {
    pub fn new(dims: Dimensions, workers: Vec<Vec<Block>>) -> Self {
        Self { dims, workers }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// # Panics
    ///
    /// Panics if `worker` is out of range.
    pub fn blocks(&self, worker: usize) -> &[Block] {
        &self.workers[worker]
    }

    /// Number of cells each worker owns
    pub fn load(&self) -> Vec<usize> {
        self.workers
            .iter()
            .map(|blocks| blocks.iter().map(Block::cell_count).sum())
            .collect()
    }

    /// Owning worker of every cell, row-major.
    ///
    /// # Returns
    /// * `Ok(owners)` - every cell is owned by exactly one worker
    /// * `Err(PartitionError)` - the first overlap, gap or out-of-range block found
    pub fn owners(&self) -> Result<Vec<usize>, PartitionError> {
        let mut owners: Vec<Option<usize>> = vec![None; self.dims.cell_count()];

        for (worker, blocks) in self.workers.iter().enumerate() {
            for block in blocks {
                if block.rows.end > self.dims.rows || block.cols.end > self.dims.cols {
                    return Err(PartitionError::OutOfBounds { worker });
                }
                for cell in block.cells() {
                    let slot = &mut owners[self.dims.offset(cell)];
                    if let Some(first) = *slot {
                        return Err(PartitionError::Overlap {
                            cell,
                            first,
                            second: worker,
                        });
                    }
                    *slot = Some(worker);
                }
            }
        }

        owners
            .into_iter()
            .enumerate()
            .map(|(offset, owner)| {
                owner.ok_or_else(|| {
                    PartitionError::Uncovered(Cell::new(
                        offset / self.dims.cols,
                        offset % self.dims.cols,
                    ))
                })
            })
            .collect()
    }
}
