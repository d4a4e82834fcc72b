//! Solver registry for building solvers from identity strings
//!
//! Every solver module submits a [`SolverPlugin`] with `inventory`; the
//! registry collects them and turns a [`SolverLabel`] such as
//! `BlockCheckWait[4,100]` back into a configured solver.

use std::collections::BTreeMap;

use crate::affinity::AffinityPolicy;
use crate::error::{RegistrationError, SolverError};
use crate::label::SolverLabel;
use crate::problem::DependencyPattern;
use crate::solver::Solver;

/// Builds a solver from a label whose size count was already checked.
pub type SolverFactory = fn(&SolverLabel, AffinityPolicy) -> Result<Box<dyn Solver>, SolverError>;

/// Plugin information for automatic solver registration
///
/// # Example
///
/// ```ignore
/// inventory::submit! {
///     SolverPlugin {
///         name: "RowFill",
///         sizes: 0,
///         patterns: &[DependencyPattern::LeftUp, DependencyPattern::UpperRow],
///         deprecated: false,
///         summary: "sequential row-major fill",
///         build,
///     }
/// }
/// ```
pub struct SolverPlugin {
    /// Name used in identity strings
    pub name: &'static str,
    /// Maximum number of block sizes the label may carry
    pub sizes: usize,
    /// Dependency patterns the solver can fill
    pub patterns: &'static [DependencyPattern],
    /// Left out of benchmark suites
    pub deprecated: bool,
    /// One-line description for listings
    pub summary: &'static str,
    pub build: SolverFactory,
}

impl SolverPlugin {
    pub fn supports(&self, pattern: DependencyPattern) -> bool {
        self.patterns.contains(&pattern)
    }
}

// Enable plugin collection via inventory
inventory::collect!(SolverPlugin);

/// Builder for constructing a [`SolverRegistry`] with duplicate detection
///
/// # Example
///
/// ```no_run
/// # use dynprog_solver::SolverRegistryBuilder;
/// let registry = SolverRegistryBuilder::new()
///     .register_all_plugins()
///     .unwrap()
///     .build();
/// ```
#[derive(Default)]
pub struct SolverRegistryBuilder {
    plugins: BTreeMap<&'static str, &'static SolverPlugin>,
}

impl SolverRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single plugin
    ///
    /// # Returns
    /// * `Ok(Self)` - Builder with the plugin registered, ready for chaining
    /// * `Err(RegistrationError)` - A plugin with the same name already exists
    pub fn register(mut self, plugin: &'static SolverPlugin) -> Result<Self, RegistrationError> {
        if self.plugins.insert(plugin.name, plugin).is_some() {
            return Err(RegistrationError::DuplicateSolver(plugin.name.to_string()));
        }
        Ok(self)
    }

    /// Register all plugins submitted via `inventory::submit!`
    pub fn register_all_plugins(self) -> Result<Self, RegistrationError> {
        self.register_solver_plugins(|_| true)
    }

    /// Register the collected plugins for which `filter` returns `true`
    ///
    /// # Arguments
    /// * `filter` - A predicate that determines which plugins to register
    ///
    /// # Returns
    /// * `Ok(Self)` - Builder with matching plugins registered
    /// * `Err(RegistrationError)` - Duplicate solver name found
    pub fn register_solver_plugins<F>(mut self, filter: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&SolverPlugin) -> bool,
    {
        for plugin in inventory::iter::<SolverPlugin>() {
            if filter(plugin) {
                self = self.register(plugin)?;
            }
        }
        Ok(self)
    }

    pub fn build(self) -> SolverRegistry {
        SolverRegistry {
            plugins: self.plugins,
        }
    }
}

/// Immutable registry for looking up and creating solvers
pub struct SolverRegistry {
    plugins: BTreeMap<&'static str, &'static SolverPlugin>,
}

impl SolverRegistry {
    /// Registry holding every collected plugin.
    ///
    /// # Returns
    /// * `Err(RegistrationError)` - Two plugins share a name
    pub fn with_all_plugins() -> Result<Self, RegistrationError> {
        Ok(SolverRegistryBuilder::new().register_all_plugins()?.build())
    }

    pub fn get(&self, name: &str) -> Option<&'static SolverPlugin> {
        self.plugins.get(name).copied()
    }

    /// Registered plugins, ordered by name
    pub fn plugins(&self) -> impl Iterator<Item = &'static SolverPlugin> + '_ {
        self.plugins.values().copied()
    }

    /// Create the solver `label` names, with default affinity
    ///
    /// # Returns
    /// * `Ok(Box<dyn Solver>)` - Configured solver
    /// * `Err(SolverError)` - Unknown name, too many sizes or unsupported worker count
    pub fn create(&self, label: &SolverLabel) -> Result<Box<dyn Solver>, SolverError> {
        self.create_with(label, AffinityPolicy::default())
    }

    pub fn create_with(
        &self,
        label: &SolverLabel,
        affinity: AffinityPolicy,
    ) -> Result<Box<dyn Solver>, SolverError> {
        let plugin = self
            .get(&label.name)
            .ok_or_else(|| SolverError::NotFound(label.name.clone()))?;

        if label.sizes.len() > plugin.sizes {
            return Err(SolverError::TooManySizes {
                name: label.name.clone(),
                given: label.sizes.len(),
                max: plugin.sizes,
            });
        }
        (plugin.build)(label, affinity)
    }

    /// Parse `label` and create the solver it names
    pub fn parse(&self, label: &str) -> Result<Box<dyn Solver>, SolverError> {
        self.create(&label.parse()?)
    }
}
