//! Drives a benchmark run: suite setup, input generation and profiling

use std::fs;

use tracing::{debug, info};

use dynprog_problems::InputGenerator;
use dynprog_solver::{AffinityPolicy, RowFill, Solver, SolverRegistry};

use crate::config::Config;
use crate::error::CliError;
use crate::meta::Metadata;
use crate::output::Progress;
use crate::profiler::Profiler;
use crate::suite::build_suite;
use crate::workload::generate_batch;

/// Totals of a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub inputs: usize,
    pub solves: usize,
    pub mismatches: usize,
}

pub struct Executor {
    config: Config,
    profilers: Vec<Profiler>,
    baseline: RowFill,
    input: InputGenerator,
    thread_pool: rayon::ThreadPool,
}

impl Executor {
    /// Create the target directory, one profiler per suite entry and the
    /// metadata file.
    pub fn new(registry: &SolverRegistry, config: Config) -> Result<Self, CliError> {
        let raw_dir = config.raw_dir();
        fs::create_dir_all(&raw_dir).map_err(CliError::output(&raw_dir))?;

        let profilers = build_suite(registry, &config)?
            .iter()
            .map(|label| Profiler::create(&raw_dir, registry.create(label)?))
            .collect::<Result<Vec<_>, _>>()?;
        for profiler in &profilers {
            debug!(solver = %profiler.solver(), path = %profiler.path().display(), "profiler ready");
        }

        let input = match config.seed {
            Some(seed) => InputGenerator::new(seed),
            None => InputGenerator::from_random_seed(),
        };
        Metadata::collect(&config, input.seed(), profilers.len()).write(&config.meta_path())?;

        // Input generation runs while no solver is active, so it may use every CPU.
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("input-gen-{i}"))
            .build()?;

        Ok(Self {
            config,
            profilers,
            baseline: RowFill::new().with_affinity(AffinityPolicy::Disabled),
            input,
            thread_pool,
        })
    }

    pub fn solvers(&self) -> impl Iterator<Item = &dyn Solver> {
        self.profilers.iter().map(Profiler::solver)
    }

    pub fn seed(&self) -> u64 {
        self.input.seed()
    }

    /// Profile every solver on every generated input.
    ///
    /// # Returns
    /// * `Ok(Summary)` - All results written; with `--verify`, no mismatches
    /// * `Err(CliError::Verification)` - Some solutions differed from `RowFill`
    pub fn execute(&mut self, progress: &Progress) -> Result<Summary, CliError> {
        let config = &self.config;
        let mut summary = Summary::default();

        for (batch, &cols) in config.sizes.iter().enumerate() {
            let rows = config.rows_for(cols);
            let inputs = self.thread_pool.install(|| {
                generate_batch(config.case, rows, cols, config.inputs_per_size, batch, &self.input)
            })?;
            debug!(rows, cols, count = inputs.len(), "inputs generated");

            for workload in &inputs {
                let expected = config
                    .verify
                    .then(|| workload.run(&self.baseline).solution);
                for profiler in &mut self.profilers {
                    summary.mismatches += profiler.profile(workload, config.runs_per_input, expected)?;
                    summary.solves += config.runs_per_input;
                }
                summary.inputs += 1;
            }
            progress.size_done(cols);
        }

        info!(?summary, "benchmark finished");
        if summary.mismatches > 0 {
            return Err(CliError::Verification(summary.mismatches));
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use tempfile::TempDir;

    fn config(dir: &TempDir, extra: &[&str]) -> Config {
        let dir = dir.path().to_str().unwrap();
        let base = [
            "dynprog-bench",
            "-d",
            dir,
            "-p",
            "2",
            "--sizes",
            "6,9",
            "--inputs-per-size",
            "2",
            "--runs-per-input",
            "2",
            "--block-sizes",
            "-1,3",
            "--seed",
            "5",
            "-q",
        ];
        Config::from_args(Args::parse_from(base.iter().chain(extra))).unwrap()
    }

    #[test]
    fn test_full_run_writes_every_file() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp, &["-c", "df", "--verify"]);
        let registry = SolverRegistry::with_all_plugins().unwrap();
        let mut executor = Executor::new(&registry, config.clone()).unwrap();
        let solvers = executor.solvers().count();
        assert_eq!(executor.seed(), 5);

        let summary = executor.execute(&Progress::new(true)).unwrap();
        assert_eq!(summary.inputs, 4);
        assert_eq!(summary.solves, 4 * 2 * solvers);
        assert_eq!(summary.mismatches, 0);

        let files = fs::read_dir(config.raw_dir()).unwrap().count();
        assert_eq!(files, solvers);
        let baseline = fs::read_to_string(config.raw_dir().join("RowFill[1]")).unwrap();
        let cols: Vec<&str> = baseline
            .lines()
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(cols, vec!["6", "6", "9", "9"]);
        assert!(config.meta_path().exists());
    }

    #[test]
    fn test_explicit_solver_with_fixed_rows() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp, &["-r", "4", "--solver", "RowSplit[2,2]", "--verify"]);
        let registry = SolverRegistry::with_all_plugins().unwrap();
        let mut executor = Executor::new(&registry, config.clone()).unwrap();
        let labels: Vec<String> = executor.solvers().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["RowSplit[2,2]"]);

        executor.execute(&Progress::new(true)).unwrap();
        let content = fs::read_to_string(config.raw_dir().join("RowSplit[2,2]")).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert!(content.lines().all(|line| line.split(',').count() == 3));
    }

    #[test]
    fn test_unwritable_target() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "").unwrap();
        let args = Args::parse_from(["dynprog-bench", "-d", blocker.to_str().unwrap()]);
        let config = Config::from_args(args).unwrap();
        let registry = SolverRegistry::with_all_plugins().unwrap();
        assert!(matches!(
            Executor::new(&registry, config),
            Err(CliError::Output { .. })
        ));
    }
}
