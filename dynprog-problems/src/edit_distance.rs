//! Edit distance between two strings
//!
//! `m[i][j] = min(m[i][j-1] + 1, m[i-1][j] + 1, m[i-1][j-1] + [a_i != b_j])`
//! with `m[0][j] = j` and `m[i][0] = i`.
//!
//! [`EditDistance::new`] builds the table the published benchmark numbers
//! were measured on: its dimensions are `|a| x |b|` and row/column 0 stand
//! for the first characters, so the first character of either string never
//! takes part in a comparison. [`EditDistance::canonical`] adds the empty
//! prefix row and column and yields the textbook distance.

use std::fmt;

use dynprog_solver::{Cell, DependencyPattern, Dimensions, Problem, Table};

use crate::error::ProblemError;
use crate::grid::ValueGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Indexing {
    /// `|a| x |b|`, compares `a[i]` with `b[j]`
    Truncated,
    /// `(|a|+1) x (|b|+1)`, compares `a[i-1]` with `b[j-1]`
    Canonical,
}

#[derive(Debug)]
pub struct EditDistance {
    a: Vec<char>,
    b: Vec<char>,
    indexing: Indexing,
    grid: ValueGrid,
}

impl EditDistance {
    /// Truncated-boundary table over `a` and `b`.
    ///
    /// # Returns
    /// * `Err(ProblemError::EmptyInput)` - either string is empty
    pub fn new(a: &str, b: &str) -> Result<Self, ProblemError> {
        if a.is_empty() {
            return Err(ProblemError::EmptyInput("first string"));
        }
        if b.is_empty() {
            return Err(ProblemError::EmptyInput("second string"));
        }
        Ok(Self::build(a.chars().collect(), b.chars().collect(), Indexing::Truncated))
    }

    /// Textbook edit distance; empty strings are allowed.
    pub fn canonical(a: &str, b: &str) -> Self {
        Self::build(a.chars().collect(), b.chars().collect(), Indexing::Canonical)
    }

    fn build(a: Vec<char>, b: Vec<char>, indexing: Indexing) -> Self {
        let dims = match indexing {
            Indexing::Truncated => Dimensions::new(a.len(), b.len()),
            Indexing::Canonical => Dimensions::new(a.len() + 1, b.len() + 1),
        };
        Self {
            a,
            b,
            indexing,
            grid: ValueGrid::new(dims),
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.indexing == Indexing::Canonical
    }

    fn substitution_cost(&self, row: usize, col: usize) -> i64 {
        let (x, y) = match self.indexing {
            Indexing::Truncated => (self.a[row], self.b[col]),
            Indexing::Canonical => (self.a[row - 1], self.b[col - 1]),
        };
        i64::from(x != y)
    }
}

impl Table for EditDistance {
    fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    fn pattern(&self) -> DependencyPattern {
        DependencyPattern::LeftUp
    }

    fn is_computed(&self, cell: Cell) -> bool {
        self.grid.is_set(cell)
    }

    fn is_computable(&self, cell: Cell) -> bool {
        self.grid.check_bounds(cell);
        let Cell { row, col } = cell;
        if row == 0 || col == 0 {
            return true;
        }
        self.grid.is_set(Cell::new(row - 1, col))
            && self.grid.is_set(Cell::new(row, col - 1))
            && self.grid.is_set(Cell::new(row - 1, col - 1))
    }

    fn compute(&self, cell: Cell) {
        assert!(self.is_computable(cell), "dependencies of {cell} not computed");
        let Cell { row, col } = cell;
        let value = match (row, col) {
            (0, col) => col as i64,
            (row, 0) => row as i64,
            (row, col) => (self.grid.value(row, col - 1) + 1)
                .min(self.grid.value(row - 1, col) + 1)
                .min(self.grid.value(row - 1, col - 1) + self.substitution_cost(row, col)),
        };
        self.grid.set(cell, value);
    }

    fn is_solved(&self) -> bool {
        let dims = self.dimensions();
        self.grid.is_set(Cell::new(dims.rows - 1, dims.cols - 1))
    }
}

impl Problem for EditDistance {
    type Solution = usize;

    fn solution(&self) -> usize {
        assert!(self.is_solved(), "edit distance requested before the table is solved");
        let dims = self.dimensions();
        self.grid.value(dims.rows - 1, dims.cols - 1) as usize
    }

    fn fresh_copy(&self) -> Self {
        Self::build(self.a.clone(), self.b.clone(), self.indexing)
    }
}

impl fmt::Display for EditDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a: String = self.a.iter().collect();
        let b: String = self.b.iter().collect();
        let state = if self.is_solved() { "solved" } else { "unsolved" };
        write!(f, "Edit Distance for ({a}, {b}) -- {state}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynprog_solver::{RowFill, Solver};

    fn solve(mut problem: EditDistance) -> usize {
        RowFill::new().solve(&mut problem);
        problem.solution()
    }

    #[test]
    fn test_money_monkey() {
        assert_eq!(solve(EditDistance::new("money", "monkey").unwrap()), 1);
        assert_eq!(solve(EditDistance::canonical("money", "monkey")), 1);
    }

    #[test]
    fn test_truncated_ignores_first_characters() {
        // Only "itten" vs "itting" is compared.
        assert_eq!(solve(EditDistance::new("kitten", "sitting").unwrap()), 2);
        assert_eq!(solve(EditDistance::canonical("kitten", "sitting")), 3);
        assert_eq!(solve(EditDistance::new("xab", "yab").unwrap()), 0);
    }

    #[test]
    fn test_canonical_with_empty_strings() {
        assert_eq!(solve(EditDistance::canonical("", "")), 0);
        assert_eq!(solve(EditDistance::canonical("abc", "")), 3);
        assert_eq!(solve(EditDistance::canonical("", "ab")), 2);
    }

    #[test]
    fn test_rejects_empty_truncated_input() {
        assert_eq!(
            EditDistance::new("", "abc").unwrap_err(),
            ProblemError::EmptyInput("first string")
        );
        assert_eq!(
            EditDistance::new("abc", "").unwrap_err(),
            ProblemError::EmptyInput("second string")
        );
    }

    #[test]
    fn test_dimensions() {
        let truncated = EditDistance::new("money", "monkey").unwrap();
        assert_eq!(truncated.dimensions(), Dimensions::new(5, 6));
        let canonical = EditDistance::canonical("money", "monkey");
        assert_eq!(canonical.dimensions(), Dimensions::new(6, 7));
        assert!(canonical.is_canonical());
    }

    #[test]
    fn test_computable_needs_up_left_and_diagonal() {
        let problem = EditDistance::new("ab", "cd").unwrap();
        assert!(problem.is_computable(Cell::new(0, 1)));
        assert!(problem.is_computable(Cell::new(1, 0)));
        assert!(!problem.is_computable(Cell::new(1, 1)));

        problem.compute(Cell::new(0, 1));
        problem.compute(Cell::new(1, 0));
        assert!(!problem.is_computable(Cell::new(1, 1)));
        problem.compute(Cell::new(0, 0));
        assert!(problem.is_computable(Cell::new(1, 1)));
    }

    #[test]
    fn test_fresh_copy_of_partial_fill() {
        let problem = EditDistance::canonical("abc", "abd");
        problem.compute(Cell::new(0, 0));
        problem.compute(Cell::new(0, 1));
        problem.compute(Cell::new(1, 0));

        let copy = problem.fresh_copy();
        assert!(copy.grid.snapshot().iter().all(Option::is_none));
        assert!(copy.is_computable(Cell::new(0, 0)));
        assert!(!copy.is_computable(Cell::new(1, 1)));
        assert!(problem.is_computable(Cell::new(1, 1)));
        assert_eq!(problem.grid.snapshot().iter().flatten().count(), 3);
        assert_eq!(solve(copy), 1);
    }

    #[test]
    fn test_computed_cells_stay_computed() {
        let problem = EditDistance::new("money", "monkey").unwrap();
        let mut seen = problem.grid.snapshot();
        for row in 0..5 {
            for col in 0..6 {
                problem.compute(Cell::new(row, col));
                let now = problem.grid.snapshot();
                for (before, after) in seen.iter().zip(&now) {
                    assert!(before.is_none() || before == after);
                }
                seen = now;
            }
        }
        assert!(problem.is_solved());
    }

    #[test]
    fn test_fresh_copy_is_independent() {
        let mut solved = EditDistance::new("money", "monkey").unwrap();
        RowFill::new().solve(&mut solved);

        let copy = solved.fresh_copy();
        assert!(solved.is_solved());
        assert!(!copy.is_solved());
        assert!(!copy.is_computed(Cell::new(0, 0)));
        assert_eq!(copy.dimensions(), solved.dimensions());
        assert_eq!(solve(copy), solved.solution());
    }

    #[test]
    fn test_display() {
        let mut problem = EditDistance::new("money", "monkey").unwrap();
        assert_eq!(problem.to_string(), "Edit Distance for (money, monkey) -- unsolved");
        RowFill::new().solve(&mut problem);
        assert_eq!(problem.to_string(), "Edit Distance for (money, monkey) -- solved");
    }

    #[test]
    #[should_panic(expected = "before the table is solved")]
    fn test_solution_before_solved_panics() {
        EditDistance::new("ab", "cd").unwrap().solution();
    }

    #[test]
    #[should_panic(expected = "not computed")]
    fn test_compute_uncomputable_panics() {
        EditDistance::new("ab", "cd").unwrap().compute(Cell::new(1, 1));
    }

    #[test]
    #[should_panic(expected = "outside of 2x2 table")]
    fn test_out_of_range_panics() {
        EditDistance::new("ab", "cd").unwrap().is_computed(Cell::new(2, 0));
    }
}
