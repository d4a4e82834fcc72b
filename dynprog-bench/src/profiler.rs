//! Timing one solver over a series of inputs

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::error;

use dynprog_solver::Solver;

use crate::error::CliError;
use crate::workload::{Solution, Workload};

/// Times one solver and appends its results to `raw/<label>`.
///
/// Every profiled input adds one line: the column count followed by the
/// wall-clock milliseconds of each run, e.g. `1200,31,29,30`.
pub struct Profiler {
    solver: Box<dyn Solver>,
    path: PathBuf,
    target: BufWriter<File>,
}

impl Profiler {
    /// Create (or truncate) the result file for `solver` in `raw_dir`
    pub fn create(raw_dir: &Path, solver: Box<dyn Solver>) -> Result<Self, CliError> {
        let path = raw_dir.join(solver.to_string());
        let file = File::create(&path).map_err(CliError::output(&path))?;
        Ok(Self {
            solver,
            path,
            target: BufWriter::new(file),
        })
    }

    pub fn solver(&self) -> &dyn Solver {
        self.solver.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Solve `runs` fresh copies of `workload` and record the timings.
    ///
    /// # Arguments
    /// * `expected` - Baseline solution; runs that disagree are logged
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of runs whose solution differed from `expected`
    /// * `Err(CliError)` - The result line could not be written
    pub fn profile(
        &mut self,
        workload: &Workload,
        runs: usize,
        expected: Option<Solution>,
    ) -> Result<usize, CliError> {
        let mut line = workload.cols().to_string();
        let mut mismatches = 0;

        for _ in 0..runs {
            let run = workload.run(self.solver.as_ref());
            line.push_str(&format!(",{}", run.elapsed.as_millis()));

            if let Some(expected) = expected
                && run.solution != expected
            {
                error!(
                    solver = %self.solver,
                    %expected,
                    actual = %run.solution,
                    dims = %workload.table().dimensions(),
                    "solution differs from the sequential fill"
                );
                mismatches += 1;
            }
        }

        writeln!(self.target, "{line}").map_err(CliError::output(&self.path))?;
        self.target.flush().map_err(CliError::output(&self.path))?;
        Ok(mismatches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynprog_problems::{EditDistance, RangeSum};
    use dynprog_solver::{AffinityPolicy, BlockCheckWait, BlockSize, RowFill};
    use tempfile::TempDir;

    fn row_fill() -> Box<dyn Solver> {
        Box::new(RowFill::new().with_affinity(AffinityPolicy::Disabled))
    }

    #[test]
    fn test_writes_one_line_per_input() {
        let temp = TempDir::new().unwrap();
        let mut profiler = Profiler::create(temp.path(), row_fill()).unwrap();
        assert_eq!(profiler.path(), temp.path().join("RowFill[1]"));

        let small = Workload::RangeSum(RangeSum::new(3, vec![1, 2, 3, 4]).unwrap());
        let wide = Workload::EditDistance(EditDistance::new("ab", "abcdefgh").unwrap());
        assert_eq!(profiler.profile(&small, 3, None).unwrap(), 0);
        assert_eq!(profiler.profile(&wide, 2, None).unwrap(), 0);

        let content = std::fs::read_to_string(profiler.path()).unwrap();
        let lines: Vec<Vec<&str>> = content.lines().map(|l| l.split(',').collect()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0], "4");
        assert_eq!(lines[0].len(), 4);
        assert_eq!(lines[1][0], "8");
        assert_eq!(lines[1].len(), 3);
        assert!(lines.iter().flatten().all(|field| field.parse::<u128>().is_ok()));
    }

    #[test]
    fn test_counts_mismatches() {
        let temp = TempDir::new().unwrap();
        let solver = BlockCheckWait::new(2, BlockSize::Auto).with_affinity(AffinityPolicy::Disabled);
        let mut profiler = Profiler::create(temp.path(), Box::new(solver)).unwrap();
        let workload = Workload::EditDistance(EditDistance::new("money", "monkey").unwrap());

        assert_eq!(profiler.profile(&workload, 2, Some(Solution::Distance(1))).unwrap(), 0);
        assert_eq!(profiler.profile(&workload, 2, Some(Solution::Distance(7))).unwrap(), 2);
        assert_eq!(profiler.solver().to_string(), "BlockCheckWait[2]");
    }

    #[test]
    fn test_missing_directory_is_an_output_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(matches!(
            Profiler::create(&missing, row_fill()),
            Err(CliError::Output { .. })
        ));
    }
}
