//! System metadata recorded next to the raw timings

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};

use dynprog_solver::CpuTopology;

use crate::config::Config;
use crate::error::CliError;

/// What a benchmark run was measured on, written as `key : value` lines
#[derive(Debug, Clone)]
pub struct Metadata {
    pub logical_cpus: usize,
    pub physical_cores: usize,
    pub sockets: usize,
    /// Highest worker count in the suite
    pub processors: usize,
    pub os: &'static str,
    pub arch: &'static str,
    pub version: &'static str,
    pub started: DateTime<Local>,
    pub seed: u64,
    pub case: String,
    pub solvers: usize,
}

impl Metadata {
    pub fn collect(config: &Config, seed: u64, solvers: usize) -> Self {
        let topology = CpuTopology::current();
        Self {
            logical_cpus: topology.logical_cpus(),
            physical_cores: topology.physical_cores(),
            sockets: topology.sockets(),
            processors: config.processors,
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            version: env!("CARGO_PKG_VERSION"),
            started: Local::now(),
            seed,
            case: format!("{:?}", config.case).to_lowercase(),
            solvers,
        }
    }

    fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("logical cpus", self.logical_cpus.to_string()),
            ("physical cores", self.physical_cores.to_string()),
            ("sockets", self.sockets.to_string()),
            ("processors", self.processors.to_string()),
            ("os", self.os.to_string()),
            ("arch", self.arch.to_string()),
            ("version", self.version.to_string()),
            ("started", self.started.to_rfc3339()),
            ("seed", self.seed.to_string()),
            ("case", self.case.clone()),
            ("solvers", self.solvers.to_string()),
        ]
    }

    pub fn write(&self, path: &Path) -> Result<(), CliError> {
        let content: String = self
            .lines()
            .into_iter()
            .map(|(key, value)| format!("{key} : {value}\n"))
            .collect();
        fs::write(path, content).map_err(CliError::output(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_writes_key_value_lines() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_str().unwrap();
        let args = Args::parse_from(["dynprog-bench", "-d", dir, "-p", "3", "-c", "df"]);
        let config = Config::from_args(args).unwrap();

        let meta = Metadata::collect(&config, 99, 12);
        meta.write(&config.meta_path()).unwrap();

        let content = fs::read_to_string(config.meta_path()).unwrap();
        assert!(content.lines().all(|line| line.contains(" : ")));
        assert!(content.contains("processors : 3\n"));
        assert!(content.contains("seed : 99\n"));
        assert!(content.contains("case : df\n"));
        assert!(content.contains("solvers : 12\n"));
        assert!(content.contains(&format!("os : {}\n", std::env::consts::OS)));
        assert!(meta.logical_cpus >= meta.physical_cores);
        assert!(meta.physical_cores >= meta.sockets);
    }
}
