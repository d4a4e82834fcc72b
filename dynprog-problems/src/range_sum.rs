//! Range-sum style dummy workload
//!
//! Row 0 holds `max(0, x_j)`; every later row takes the best of the up to
//! three cells above, adds `x_j` and clamps at zero. The solution is the
//! minimum of the last row. The values mean nothing; the workload exists for
//! its dependency shape, which reads up-right and never its own row.

use std::fmt;

use dynprog_solver::{Cell, DependencyPattern, Dimensions, Problem, Table};

use crate::error::ProblemError;
use crate::grid::ValueGrid;

#[derive(Debug)]
pub struct RangeSum {
    numbers: Vec<i64>,
    grid: ValueGrid,
}

impl RangeSum {
    /// Table with `iterations` rows over `numbers`.
    ///
    /// A cell in row `r` is at most `(r + 1) * max|x|`, so every number must
    /// stay within [`RangeSum::value_limit`] for the sums to fit in an `i64`.
    ///
    /// # Returns
    /// * `Err(ProblemError)` - zero iterations, no numbers or a number out of range
    pub fn new(iterations: usize, numbers: Vec<i64>) -> Result<Self, ProblemError> {
        if iterations == 0 {
            return Err(ProblemError::NoIterations);
        }
        if numbers.is_empty() {
            return Err(ProblemError::EmptyInput("numbers"));
        }
        let limit = Self::value_limit(iterations);
        if let Some(&value) = numbers.iter().find(|x| x.unsigned_abs() > limit.unsigned_abs()) {
            return Err(ProblemError::ValueOutOfRange { value, limit });
        }
        let dims = Dimensions::new(iterations, numbers.len());
        Ok(Self {
            numbers,
            grid: ValueGrid::new(dims),
        })
    }

    /// Largest magnitude a number may have in a table of `iterations` rows.
    pub fn value_limit(iterations: usize) -> i64 {
        i64::try_from(iterations).map_or(0, |rows| i64::MAX / rows.saturating_add(1))
    }

    pub fn iterations(&self) -> usize {
        self.grid.dimensions().rows
    }

    pub fn numbers(&self) -> &[i64] {
        &self.numbers
    }

    /// Columns of the row above that `col` reads.
    fn upper_cols(&self, col: usize) -> std::ops::RangeInclusive<usize> {
        let last = self.numbers.len() - 1;
        col.saturating_sub(1)..=(col + 1).min(last)
    }
}

impl Table for RangeSum {
    fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    fn pattern(&self) -> DependencyPattern {
        DependencyPattern::UpperRow
    }

    fn is_computed(&self, cell: Cell) -> bool {
        self.grid.is_set(cell)
    }

    fn is_computable(&self, cell: Cell) -> bool {
        self.grid.check_bounds(cell);
        cell.row == 0
            || self
                .upper_cols(cell.col)
                .all(|col| self.grid.is_set(Cell::new(cell.row - 1, col)))
    }

    fn compute(&self, cell: Cell) {
        assert!(self.is_computable(cell), "trying to compute uncomputable cell {cell}");
        let x = self.numbers[cell.col];
        let value = if cell.row == 0 {
            x
        } else {
            self.upper_cols(cell.col)
                .map(|col| self.grid.value(cell.row - 1, col) + x)
                .max()
                .unwrap_or(x)
        };
        self.grid.set(cell, value.max(0));
    }

    fn is_solved(&self) -> bool {
        self.grid.row(self.iterations() - 1).all(|value| value.is_some())
    }
}

impl Problem for RangeSum {
    type Solution = i64;

    fn solution(&self) -> i64 {
        assert!(self.is_solved(), "trying to get solution of unsolved problem");
        self.grid
            .row(self.iterations() - 1)
            .flatten()
            .min()
            .unwrap_or_default()
    }

    fn fresh_copy(&self) -> Self {
        Self {
            numbers: self.numbers.clone(),
            grid: ValueGrid::new(self.grid.dimensions()),
        }
    }
}

impl fmt::Display for RangeSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_solved() { "solved" } else { "unsolved" };
        write!(
            f,
            "Range Sum over {} numbers, {} iterations -- {state}",
            self.numbers.len(),
            self.iterations()
        )
    }
}
