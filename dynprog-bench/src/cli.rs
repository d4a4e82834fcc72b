//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use dynprog_solver::DependencyPattern;

/// Workload the benchmark fills
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum Case {
    /// Edit distance between random strings (left-up dependencies)
    Df,
    /// Range-sum dummy over random numbers (reads the three cells above)
    #[default]
    Rs,
}

impl Case {
    pub fn pattern(self) -> DependencyPattern {
        match self {
            Case::Df => DependencyPattern::LeftUp,
            Case::Rs => DependencyPattern::UpperRow,
        }
    }
}

/// Wavefront scheduler benchmark
#[derive(Parser, Debug)]
#[command(
    name = "dynprog-bench",
    about = "Time every wavefront scheduler on generated DP tables",
    version
)]
pub struct Args {
    /// Directory receiving the raw timings and the metadata file
    #[arg(short = 'd', long, default_value = "~/paralleldynprog")]
    pub target_dir: PathBuf,

    /// Highest worker count to benchmark (defaults to the physical core count)
    #[arg(short, long)]
    pub processors: Option<usize>,

    /// Workload: df (edit distance) or rs (range-sum dummy)
    #[arg(short, long, value_enum, default_value = "rs")]
    pub case: Case,

    /// Fixed row count; by default tables are square
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// Column counts to benchmark (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "1000,1200,1400,1600,1800,2000,4000,6000,8000,10000"
    )]
    pub sizes: Vec<usize>,

    /// Random inputs generated per size
    #[arg(long, default_value_t = 15)]
    pub inputs_per_size: usize,

    /// Timed runs per input and solver
    #[arg(long, default_value_t = 7)]
    pub runs_per_input: usize,

    /// Block sizes passed to the parallel solvers, -1 for automatic (comma-separated)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "-1,100")]
    pub block_sizes: Vec<i64>,

    /// Benchmark only these solvers, e.g. BlockCheckWait[4,100] (repeatable)
    #[arg(long = "solver")]
    pub solvers: Vec<String>,

    /// Seed for input generation (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Check every solution against the sequential fill
    #[arg(long)]
    pub verify: bool,

    /// Quiet mode - no progress output
    #[arg(short, long)]
    pub quiet: bool,
}
