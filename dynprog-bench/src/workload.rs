//! Random benchmark inputs

use std::fmt;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use dynprog_problems::{EditDistance, InputGenerator, ProblemError, RangeSum};
use dynprog_solver::{Problem, Solver, Table};

use crate::cli::Case;

/// One generated table, not yet solved
#[derive(Debug)]
pub enum Workload {
    EditDistance(EditDistance),
    RangeSum(RangeSum),
}

impl Workload {
    /// Table with `rows` rows and `cols` columns of random content.
    ///
    /// Edit distance compares a `rows`-letter string with a `cols`-letter
    /// one; the range-sum dummy runs `rows` iterations over `cols` numbers.
    pub fn generate(
        case: Case,
        rows: usize,
        cols: usize,
        input: &mut InputGenerator,
    ) -> Result<Self, ProblemError> {
        Ok(match case {
            Case::Df => {
                let a = input.random_string(rows);
                let b = input.random_string(cols);
                Workload::EditDistance(EditDistance::new(&a, &b)?)
            }
            Case::Rs => Workload::RangeSum(RangeSum::new(rows, input.random_array(cols))?),
        })
    }

    pub fn table(&self) -> &dyn Table {
        match self {
            Workload::EditDistance(problem) => problem,
            Workload::RangeSum(problem) => problem,
        }
    }

    pub fn cols(&self) -> usize {
        self.table().dimensions().cols
    }
}

/// Final value of a solved workload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solution {
    Distance(usize),
    Sum(i64),
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solution::Distance(distance) => write!(f, "{distance}"),
            Solution::Sum(sum) => write!(f, "{sum}"),
        }
    }
}

/// One timed solve
#[derive(Debug, Clone, Copy)]
pub struct Run {
    pub elapsed: Duration,
    pub solution: Solution,
}

impl Workload {
    /// Solves a fresh copy with `solver`; only the solve itself is timed.
    pub fn run(&self, solver: &dyn Solver) -> Run {
        match self {
            Workload::EditDistance(problem) => timed(problem, solver, Solution::Distance),
            Workload::RangeSum(problem) => timed(problem, solver, Solution::Sum),
        }
    }
}

fn timed<P: Problem>(
    problem: &P,
    solver: &dyn Solver,
    wrap: impl FnOnce(P::Solution) -> Solution,
) -> Run {
    let mut copy = problem.fresh_copy();
    let start = Instant::now();
    solver.solve(&mut copy);
    let elapsed = start.elapsed();
    Run {
        elapsed,
        solution: wrap(copy.solution()),
    }
}

/// `count` inputs for tables of `rows x cols`, generated in parallel.
///
/// Input `i` of batch `batch` depends only on the seed, so the result is
/// the same however rayon schedules the work.
pub fn generate_batch(
    case: Case,
    rows: usize,
    cols: usize,
    count: usize,
    batch: usize,
    seed: &InputGenerator,
) -> Result<Vec<Workload>, ProblemError> {
    (0..count)
        .into_par_iter()
        .map(|index| {
            let mut input = seed.fork((batch * count + index) as u64);
            Workload::generate(case, rows, cols, &mut input)
        })
        .collect()
}
