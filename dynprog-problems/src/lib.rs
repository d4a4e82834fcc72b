//! Sample workloads for the wavefront schedulers
//!
//! Two tables implementing [`dynprog_solver::Problem`]:
//!
//! - [`EditDistance`]: left-up dependencies, solved once the bottom-right
//!   cell is known
//! - [`RangeSum`]: reads the three cells above, solved once the whole last
//!   row is known
//!
//! Both store their values in a [`ValueGrid`] of atomics, so any solver may
//! fill them from several threads. [`InputGenerator`] produces reproducible
//! random inputs for tests and benchmarks.
//!
//! # Example
//!
//! ```
//! use dynprog_problems::EditDistance;
//! use dynprog_solver::{BlockSize, BlockCheckWait, Problem, Solver};
//!
//! let mut problem = EditDistance::canonical("money", "monkey");
//! BlockCheckWait::new(2, BlockSize::Auto).solve(&mut problem);
//! assert_eq!(problem.solution(), 1);
//! ```

mod edit_distance;
mod error;
mod grid;
mod input;
mod range_sum;

pub use edit_distance::EditDistance;
pub use error::ProblemError;
pub use grid::ValueGrid;
pub use input::InputGenerator;
pub use range_sum::RangeSum;
