//! The solver configurations a benchmark run profiles

use itertools::Itertools;

use dynprog_solver::{RowFill, SolverError, SolverLabel, SolverRegistry};

use crate::config::Config;
use crate::error::CliError;

/// Labels to profile, in run order.
///
/// With explicit `--solver` labels only those run (deduplicated, each checked
/// against the workload's pattern). Otherwise the suite is `RowFill[1]`
/// followed by every non-deprecated solver supporting the workload, for every
/// worker count up to `processors` and every configured block size. Solvers
/// with two sizes run once with the size as width only and once as both width
/// and height.
pub fn build_suite(registry: &SolverRegistry, config: &Config) -> Result<Vec<SolverLabel>, CliError> {
    let pattern = config.case.pattern();

    if !config.solvers.is_empty() {
        let labels = config
            .solvers
            .iter()
            .map(|label| label.parse::<SolverLabel>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(SolverError::from)?;
        for label in &labels {
            let plugin = registry
                .get(&label.name)
                .ok_or_else(|| SolverError::NotFound(label.name.clone()))?;
            if !plugin.supports(pattern) {
                return Err(CliError::Config(format!(
                    "{label} cannot fill {pattern} tables"
                )));
            }
        }
        return Ok(labels.into_iter().unique().collect());
    }

    let baseline = SolverLabel::new(RowFill::NAME, 1, &[]);
    let plugins: Vec<_> = registry
        .plugins()
        .filter(|plugin| plugin.name != RowFill::NAME)
        .filter(|plugin| !plugin.deprecated && plugin.supports(pattern))
        .collect();

    let parallel = (1..=config.processors)
        .cartesian_product(&config.block_sizes)
        .flat_map(|(workers, &size)| {
            plugins.iter().flat_map(move |plugin| {
                (1..=plugin.sizes.max(1)).map(move |count| {
                    let sizes = vec![size; count.min(plugin.sizes)];
                    SolverLabel::new(plugin.name, workers, &sizes)
                })
            })
        });

    Ok(std::iter::once(baseline).chain(parallel).unique().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Args, Case};
    use clap::Parser;
    use dynprog_solver::Solver;
    use proptest::prelude::*;

    fn config(extra: &[&str]) -> Config {
        let args = ["dynprog-bench", "-d", "/tmp/bench"].iter().chain(extra);
        Config::from_args(Args::parse_from(args)).unwrap()
    }

    fn suite(extra: &[&str]) -> Result<Vec<String>, CliError> {
        let registry = SolverRegistry::with_all_plugins().unwrap();
        let labels = build_suite(&registry, &config(extra))?;
        Ok(labels.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_range_sum_suite() {
        let labels = suite(&["-p", "2", "-c", "rs"]).unwrap();
        assert_eq!(
            labels,
            vec![
                "RowFill[1]",
                "BlockCheckSleep[1]",
                "BlockCheckWait[1]",
                "CellCheckWait[1]",
                "RowSplit[1]",
                "BlockCheckSleep[1,100]",
                "BlockCheckWait[1,100]",
                "RowSplit[1,100]",
                "BlockCheckSleep[2]",
                "BlockCheckWait[2]",
                "CellCheckWait[2]",
                "RowSplit[2]",
                "BlockCheckSleep[2,100]",
                "BlockCheckWait[2,100]",
                "RowSplit[2,100]",
            ]
        );
    }

    #[test]
    fn test_edit_distance_suite_has_column_blocks() {
        let labels = suite(&["-p", "1", "-c", "df", "--block-sizes", "8"]).unwrap();
        assert_eq!(
            labels,
            vec![
                "RowFill[1]",
                "BlockCheckSleep[1,8]",
                "BlockCheckWait[1,8]",
                "CellCheckWait[1]",
                "ColumnBlock[1,8]",
                "ColumnBlock[1,8,8]",
            ]
        );
        assert!(!labels.iter().any(|label| label.starts_with("RowSplit")));
        assert!(!labels.iter().any(|label| label.starts_with("CellCheck[")));
    }

    #[test]
    fn test_explicit_solvers_replace_suite() {
        let labels = suite(&[
            "--solver",
            "RowSplit[3,10]",
            "--solver",
            "RowSplit[3,10]",
            "--solver",
            "CellCheck[2]",
        ])
        .unwrap();
        assert_eq!(labels, vec!["RowSplit[3,10]", "CellCheck[2]"]);
    }

    #[test]
    fn test_explicit_solver_errors() {
        assert!(matches!(
            suite(&["--solver", "Nope[2]"]),
            Err(CliError::Solver(_))
        ));
        assert!(matches!(
            suite(&["--solver", "RowSplit[x]"]),
            Err(CliError::Solver(_))
        ));
        assert!(matches!(
            suite(&["-c", "df", "--solver", "RowSplit[2]"]),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_case_default_is_range_sum() {
        assert_eq!(config(&[]).case, Case::Rs);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// *For any* processor count and block sizes, every generated label is
        /// unique, buildable and able to fill the workload.
        #[test]
        fn prop_suite_labels_are_buildable(
            processors in 1usize..6,
            sizes in prop::collection::vec(prop_oneof![Just(-1i64), 1i64..200], 1..4),
            df in any::<bool>(),
        ) {
            let sizes = sizes.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
            let processors = processors.to_string();
            let case = if df { "df" } else { "rs" };
            let config = config(&["-p", &processors, "-c", case, "--block-sizes", &sizes]);
            let registry = SolverRegistry::with_all_plugins().unwrap();

            let labels = build_suite(&registry, &config).unwrap();
            prop_assert_eq!(labels[0].to_string(), "RowFill[1]");
            prop_assert_eq!(labels.iter().unique().count(), labels.len());
            for label in &labels {
                let solver = registry.create(label).unwrap();
                prop_assert!(solver.supports(config.case.pattern()), "{}", label);
                prop_assert!(label.workers <= config.processors);
                prop_assert_eq!(label.to_string().parse::<SolverLabel>().unwrap(), label.clone());
            }
        }
    }
}
