//! Table contract shared by every scheduler and every workload

use std::fmt;

/// Index of one table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Size of a table's index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Row-major position of `cell`
    ///
    /// # Panics
    ///
    /// Panics if `cell` lies outside the table.
    pub fn offset(&self, cell: Cell) -> usize {
        assert!(
            self.contains(cell),
            "cell {cell} outside of {}x{} table",
            self.rows,
            self.cols
        );
        cell.row * self.cols + cell.col
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Which neighbours a cell reads from
///
/// The schedulers only ever see the table through its computed/computable
/// predicates, but the partition geometry decides which neighbour's progress
/// a worker has to wait for, so every table declares its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyPattern {
    /// `(i-1, j)`, `(i, j-1)` and `(i-1, j-1)`. Row 0 and column 0 are free.
    LeftUp,
    /// `(i-1, j-1)`, `(i-1, j)` and `(i-1, j+1)`. Row 0 is free.
    UpperRow,
}

impl DependencyPattern {
    /// How many columns right of `j` a cell reads in the row above.
    pub const fn upper_reach(&self) -> usize {
        match self {
            Self::LeftUp => 0,
            Self::UpperRow => 1,
        }
    }

    /// Whether a cell reads its left neighbour in the same row.
    pub const fn reads_same_row(&self) -> bool {
        matches!(self, Self::LeftUp)
    }
}

impl fmt::Display for DependencyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftUp => f.write_str("left-up"),
            Self::UpperRow => f.write_str("upper-row"),
        }
    }
}

/// A DP table as seen by the schedulers.
///
/// Every method takes `&self`: workers share one table and write disjoint
/// cells. Implementations must publish a computed cell with release semantics
/// and observe it with acquire semantics so that a worker reading a
/// neighbour's freshly written cell sees its value.
///
/// # Contract
///
/// - Indices must satisfy `dimensions().contains(cell)`; anything else panics.
/// - `compute` panics if the cell is not computable or already computed.
/// - A computed cell never becomes uncomputed again.
pub trait Table: Send + Sync {
    fn dimensions(&self) -> Dimensions;

    fn pattern(&self) -> DependencyPattern;

    fn is_computed(&self, cell: Cell) -> bool;

    /// Whether all cells `cell` depends on are computed.
    fn is_computable(&self, cell: Cell) -> bool;

    /// Writes the value of `cell` from its dependencies.
    fn compute(&self, cell: Cell);

    /// Whether every cell the solution is read from is computed.
    fn is_solved(&self) -> bool;
}

/// A workload with a typed solution.
pub trait Problem: Table {
    type Solution: Clone + PartialEq + fmt::Debug + Send;

    /// # Panics
    ///
    /// Panics if the table is not solved yet.
    fn solution(&self) -> Self::Solution;

    /// A new instance over the same inputs with every cell uncomputed.
    fn fresh_copy(&self) -> Self
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_row_major() {
        let dims = Dimensions::new(3, 4);
        assert_eq!(dims.offset(Cell::new(0, 0)), 0);
        assert_eq!(dims.offset(Cell::new(1, 0)), 4);
        assert_eq!(dims.offset(Cell::new(2, 3)), 11);
        assert_eq!(dims.cell_count(), 12);
    }

    #[test]
    #[should_panic(expected = "outside of 3x4 table")]
    fn test_offset_rejects_out_of_range() {
        Dimensions::new(3, 4).offset(Cell::new(3, 0));
    }

    #[test]
    fn test_upper_reach() {
        assert_eq!(DependencyPattern::LeftUp.upper_reach(), 0);
        assert_eq!(DependencyPattern::UpperRow.upper_reach(), 1);
        assert!(DependencyPattern::LeftUp.reads_same_row());
        assert!(!DependencyPattern::UpperRow.reads_same_row());
    }
}
