//! Shared value storage for the sample workloads
//!
//! One `AtomicI64` per cell; `-1` marks an uncomputed cell, so stored values
//! must be non-negative. Writes publish with `Release`, reads observe with
//! `Acquire`: a worker that sees a neighbour's cell as computed also sees
//! its value.

use std::sync::atomic::{AtomicI64, Ordering};

use dynprog_solver::{Cell, Dimensions};

const UNSET: i64 = -1;

#[derive(Debug)]
pub struct ValueGrid {
    dims: Dimensions,
    cells: Box<[AtomicI64]>,
}

impl ValueGrid {
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: (0..dims.cell_count()).map(|_| AtomicI64::new(UNSET)).collect(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    pub fn get(&self, cell: Cell) -> Option<i64> {
        let value = self.cells[self.dims.offset(cell)].load(Ordering::Acquire);
        (value != UNSET).then_some(value)
    }

    /// # Panics
    ///
    /// Panics if `cell` is outside the grid.
    pub fn check_bounds(&self, cell: Cell) {
        self.dims.offset(cell);
    }

    pub fn is_set(&self, cell: Cell) -> bool {
        self.get(cell).is_some()
    }

    /// Value of a computed cell.
    ///
    /// # Panics
    ///
    /// Panics if `cell` has not been computed.
    pub fn value(&self, row: usize, col: usize) -> i64 {
        let cell = Cell::new(row, col);
        self.get(cell)
            .unwrap_or_else(|| panic!("cell {cell} read before it was computed"))
    }

    /// Stores the value of `cell`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative or `cell` already holds a value; the
    /// latter means two workers were assigned the same cell.
    pub fn set(&self, cell: Cell, value: i64) {
        assert!(value >= 0, "negative value {value} for cell {cell}");
        let slot = &self.cells[self.dims.offset(cell)];
        if let Err(previous) = slot.compare_exchange(UNSET, value, Ordering::Release, Ordering::Relaxed) {
            panic!("cell {cell} computed twice (already {previous})");
        }
    }

    /// Values of `row`, `None` where uncomputed.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Option<i64>> + '_ {
        (0..self.dims.cols).map(move |col| self.get(Cell::new(row, col)))
    }

    /// Every value in row-major order
    pub fn snapshot(&self) -> Vec<Option<i64>> {
        (0..self.dims.rows).flat_map(|row| self.row(row)).collect()
    }
}
