//! Configuration resolution from CLI args

use std::path::{Path, PathBuf};

use dynprog_solver::{BlockSize, CpuTopology};

use crate::cli::{Args, Case};
use crate::error::CliError;

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for `raw/` and `meta`
    pub target_dir: PathBuf,
    /// Highest worker count in the suite
    pub processors: usize,
    pub case: Case,
    /// Fixed row count (None = square tables)
    pub rows: Option<usize>,
    /// Column counts, in run order
    pub sizes: Vec<usize>,
    pub inputs_per_size: usize,
    pub runs_per_input: usize,
    pub block_sizes: Vec<BlockSize>,
    /// Explicit solver labels replacing the generated suite
    pub solvers: Vec<String>,
    pub seed: Option<u64>,
    pub verify: bool,
    pub quiet: bool,
}

impl Config {
    /// Build config from CLI args, validating counts and block sizes
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        let target_dir = expand_tilde(&args.target_dir);

        let processors = match args.processors {
            Some(0) => return Err(CliError::Config("processors must be positive".to_string())),
            Some(p) => p,
            None => CpuTopology::current().physical_cores(),
        };

        if args.rows == Some(0) {
            return Err(CliError::Config("rows must be positive".to_string()));
        }
        if args.sizes.is_empty() || args.sizes.contains(&0) {
            return Err(CliError::Config(
                "sizes must be a non-empty list of positive column counts".to_string(),
            ));
        }
        if args.inputs_per_size == 0 || args.runs_per_input == 0 {
            return Err(CliError::Config(
                "inputs and runs per input must be positive".to_string(),
            ));
        }

        let block_sizes = args
            .block_sizes
            .iter()
            .map(|&size| parse_block_size(size))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Config {
            target_dir,
            processors,
            case: args.case,
            rows: args.rows,
            sizes: args.sizes,
            inputs_per_size: args.inputs_per_size,
            runs_per_input: args.runs_per_input,
            block_sizes,
            solvers: args.solvers,
            seed: args.seed,
            verify: args.verify,
            quiet: args.quiet,
        })
    }

    /// Directory holding one timing file per solver
    pub fn raw_dir(&self) -> PathBuf {
        self.target_dir.join("raw")
    }

    pub fn meta_path(&self) -> PathBuf {
        self.target_dir.join("meta")
    }

    /// Row count of the tables generated for `size` columns
    pub fn rows_for(&self, size: usize) -> usize {
        self.rows.unwrap_or(size)
    }
}

/// `-1` selects the solver's automatic size
fn parse_block_size(size: i64) -> Result<BlockSize, CliError> {
    match size {
        -1 => Ok(BlockSize::Auto),
        s if s > 0 => Ok(BlockSize::fixed(s as usize)),
        s => Err(CliError::Config(format!(
            "invalid block size {s}: use -1 or a positive number"
        ))),
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.get(2..).unwrap_or_default());
    }
    path.to_path_buf()
}
