//! Parallel wavefront filling of two-dimensional DP tables
//!
//! A DP table where cell `(i, j)` reads already computed neighbours above
//! and to the left can be filled by several threads at once, provided every
//! thread waits for the cells it reads. This crate provides a family of
//! schedulers that differ in how work is partitioned and how workers wait.
//!
//! # Overview
//!
//! - [`Table`] / [`Problem`]: what a scheduler needs from a DP table
//! - [`Solver`]: the scheduler interface, one `solve` per table
//! - [`RowFill`]: sequential baseline and correctness reference
//! - [`RowSplit`]: column blocks per row with a barrier between rows
//! - [`CellCheck`], [`CellCheckWait`], [`BlockCheckSleep`], [`BlockCheckWait`],
//!   [`ColumnBlock`]: diagonal-frontier solvers on a shared driver
//! - [`SolverRegistry`]: builds solvers from identity strings such as
//!   `BlockCheckWait[4,100]`
//!
//! # Quick Example
//!
//! ```no_run
//! use dynprog_solver::{BlockSize, BlockCheckWait, Problem, Solver};
//!
//! fn fill<P: Problem>(mut problem: P) -> P::Solution {
//!     let solver = BlockCheckWait::new(4, BlockSize::Auto);
//!     solver.solve(&mut problem);
//!     problem.solution()
//! }
//! ```
//!
//! # Synchronization
//!
//! Workers never share a cell, and the table publishes each computed cell
//! with release/acquire ordering. Blocking solvers wait on a [`GateArray`],
//! one condition variable per worker, always re-checking their predicate
//! after waking. If a worker panics the gates (or the row barrier) are
//! aborted, its peers panic instead of waiting forever, and `solve` re-raises
//! the original panic.

mod affinity;
mod barrier;
mod error;
mod gate;
mod label;
mod partition;
mod problem;
mod registry;
mod solver;
mod solvers;
mod worker;

// Re-export public API
pub use affinity::{AffinityPolicy, CpuInfo, CpuTopology, PinGuard, pin_current_thread};
pub use barrier::RowBarrier;
pub use error::{LabelError, PartitionError, RegistrationError, SolverError};
pub use gate::GateArray;
pub use label::{BlockSize, SolverLabel};
pub use partition::{Block, Partition};
pub use problem::{Cell, DependencyPattern, Dimensions, Problem, Table};
pub use registry::{SolverFactory, SolverPlugin, SolverRegistry, SolverRegistryBuilder};
pub use solver::{Solver, default_workers};
pub use solvers::{
    BlockCheckSleep, BlockCheckWait, CellCheck, CellCheckWait, ColumnBands, ColumnBlock,
    FillContext, FillStrategy, Frontier, RowFill, RowSplit, SleepPerBlock, SpinPerCell,
    WaitPerBlock, WaitPerCell,
};
pub use worker::{SolveReport, WorkerReport};

// Re-export inventory for plugin submission from other crates
pub use inventory;
