//! End-to-end runs of every registered solver on the sample workloads

use std::sync::{Mutex, mpsc};
use std::thread;
use std::time::Duration;

use dynprog_problems::{EditDistance, InputGenerator, RangeSum};
use dynprog_solver::{
    AffinityPolicy, BlockSize, Cell, DependencyPattern, Dimensions, Problem, RowFill, Solver, SolverLabel, SolverRegistry, Table,
};

const WORKERS: [usize; 4] = [1, 2, 3, 8];
const DEADLOCK_BUDGET: Duration = Duration::from_secs(30);

/// Every supporting solver at `workers`, once with automatic sizes and once
/// with small fixed ones.
fn solvers_for(table: &dyn Table, workers: usize) -> Vec<Box<dyn Solver>> {
    let registry = SolverRegistry::with_all_plugins().unwrap();
    let small = [BlockSize::fixed(3), BlockSize::fixed(2)];
    let mut solvers = Vec::new();
    for plugin in registry.plugins().filter(|p| p.supports(table.pattern())) {
        let workers = if plugin.name == RowFill::NAME { 1 } else { workers };
        for sizes in [&[][..], &small[..plugin.sizes]] {
            let label = SolverLabel::new(plugin.name, workers, sizes);
            solvers.push(registry.create_with(&label, AffinityPolicy::Disabled).unwrap());
        }
    }
    solvers
}

fn baseline<P: Problem>(problem: &P) -> P::Solution {
    let mut copy = problem.fresh_copy();
    RowFill::new()
        .with_affinity(AffinityPolicy::Disabled)
        .solve(&mut copy);
    copy.solution()
}

/// Solves a fresh copy on another thread and fails if it takes longer than
/// the budget.
fn solve_within<P>(solver: Box<dyn Solver>, problem: &P) -> P::Solution
where
    P: Problem + 'static,
    P::Solution: 'static,
{
    let name = solver.to_string();
    let mut copy = problem.fresh_copy();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        solver.solve(&mut copy);
        let _ = tx.send(copy.solution());
    });
    rx.recv_timeout(DEADLOCK_BUDGET)
        .unwrap_or_else(|_| panic!("{name} did not finish within {DEADLOCK_BUDGET:?}"))
}

#[test]
fn test_money_monkey_for_every_solver() {
    for problem in [
        EditDistance::new("money", "monkey").unwrap(),
        EditDistance::canonical("money", "monkey"),
    ] {
        for workers in WORKERS {
            for solver in solvers_for(&problem, workers) {
                let mut copy = problem.fresh_copy();
                solver.solve(&mut copy);
                assert_eq!(copy.solution(), 1, "{solver} on {copy}");
            }
        }
    }
}

#[test]
fn test_range_sum_matches_baseline_exactly() {
    let mut input = InputGenerator::new(0x5eed);
    for (iterations, len) in [(1, 1), (1, 50), (50, 1), (20, 33), (64, 64)] {
        let problem = RangeSum::new(iterations, input.random_array(len)).unwrap();
        let expected = baseline(&problem);
        for workers in WORKERS {
            for solver in solvers_for(&problem, workers) {
                let mut copy = problem.fresh_copy();
                solver.solve(&mut copy);
                assert_eq!(copy.solution(), expected, "{solver} on {copy}");
            }
        }
    }
}

#[test]
fn test_random_edit_distances_match_baseline() {
    let input = InputGenerator::new(2024);
    for index in 0..100 {
        let mut input = input.fork(index);
        let a = input.random_string_between(1, 30).unwrap();
        let b = input.random_string_between(1, 30).unwrap();
        let problem = EditDistance::new(&a, &b).unwrap();
        let expected = baseline(&problem);
        let workers = WORKERS[index as usize % WORKERS.len()];
        for solver in solvers_for(&problem, workers) {
            let mut copy = problem.fresh_copy();
            solver.solve(&mut copy);
            assert_eq!(copy.solution(), expected, "{solver} on ({a}, {b})");
        }
    }
}

#[test]
fn test_degenerate_shapes_finish() {
    let mut input = InputGenerator::new(77);
    let wide = input.random_string(60);
    let tall = input.random_string(60);
    let edit_distances = [
        EditDistance::new("a", &wide).unwrap(),
        EditDistance::new(&tall, "a").unwrap(),
        EditDistance::canonical("", &wide),
        EditDistance::canonical(&tall, ""),
    ];
    let range_sums = [
        RangeSum::new(1, input.random_array(60)).unwrap(),
        RangeSum::new(60, input.random_array(1)).unwrap(),
    ];

    for workers in WORKERS {
        for problem in &edit_distances {
            let expected = baseline(problem);
            for solver in solvers_for(problem, workers) {
                assert_eq!(solve_within(solver, problem), expected);
            }
        }
        for problem in &range_sums {
            let expected = baseline(problem);
            for solver in solvers_for(problem, workers) {
                assert_eq!(solve_within(solver, problem), expected);
            }
        }
    }
}

#[test]
fn test_more_workers_than_rows_and_columns() {
    let problem = EditDistance::new("ab", "xyz").unwrap();
    let expected = baseline(&problem);
    for solver in solvers_for(&problem, 8) {
        assert_eq!(solve_within(solver, &problem), expected);
    }
}

#[test]
fn test_solved_state_only_after_solve() {
    let problem = RangeSum::new(10, InputGenerator::new(9).random_array(10)).unwrap();
    for solver in solvers_for(&problem, 3) {
        let mut copy = problem.fresh_copy();
        assert!(!copy.is_solved());
        let report = solver.solve(&mut copy);
        assert!(copy.is_solved());
        assert_eq!(report.cells(), 100, "{solver}");
        assert!(!problem.is_solved(), "fresh copies must not share state");
    }
}

/// Wraps a table and, after every `compute`, checks that no cell seen as
/// computed earlier has gone back to uncomputed.
struct ComputedWatch<T> {
    inner: T,
    seen: Mutex<Vec<bool>>,
}

impl<T: Table> ComputedWatch<T> {
    fn new(inner: T) -> Self {
        let cells = inner.dimensions().cell_count();
        Self {
            inner,
            seen: Mutex::new(vec![false; cells]),
        }
    }

    fn check(&self) {
        let dims = self.inner.dimensions();
        let mut seen = self.seen.lock().unwrap();
        for row in 0..dims.rows {
            for col in 0..dims.cols {
                let cell = Cell::new(row, col);
                let now = self.inner.is_computed(cell);
                let before = &mut seen[dims.offset(cell)];
                assert!(!*before || now, "{cell} went back to uncomputed");
                *before = now;
            }
        }
    }
}

impl<T: Table> Table for ComputedWatch<T> {
    fn dimensions(&self) -> Dimensions {
        self.inner.dimensions()
    }

    fn pattern(&self) -> DependencyPattern {
        self.inner.pattern()
    }

    fn is_computed(&self, cell: Cell) -> bool {
        self.inner.is_computed(cell)
    }

    fn is_computable(&self, cell: Cell) -> bool {
        self.inner.is_computable(cell)
    }

    fn compute(&self, cell: Cell) {
        self.inner.compute(cell);
        self.check();
    }

    fn is_solved(&self) -> bool {
        self.inner.is_solved()
    }
}

#[test]
fn test_computed_cells_stay_computed_under_parallel_solves() {
    let edit = EditDistance::new("wavefront", "waveforms").unwrap();
    let sum = RangeSum::new(7, vec![3, -1, 4, -1, 5, -9, 2, 6]).unwrap();

    for workers in [2, 3] {
        for solver in solvers_for(&edit, workers) {
            let mut watched = ComputedWatch::new(edit.fresh_copy());
            solver.solve(&mut watched);
            watched.check();
            assert!(watched.is_solved(), "{solver}");
        }
        for solver in solvers_for(&sum, workers) {
            let mut watched = ComputedWatch::new(sum.fresh_copy());
            solver.solve(&mut watched);
            watched.check();
            assert!(watched.is_solved(), "{solver}");
        }
    }
}
