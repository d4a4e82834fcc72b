//! Solver identity strings
//!
//! Every solver is identified by `Name[workers]`, `Name[workers,size]` or
//! `Name[workers,size,size]`, e.g. `BlockCheckWait[4,100]`. A size of `-1`
//! stands for the solver's default, which it derives from the table
//! dimensions at solve time. The same strings name the benchmark output files.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::LabelError;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\[(\d+)(?:,(-?\d+))?(?:,(-?\d+))?\]$").expect("label pattern is valid")
});

/// A block dimension: either fixed or derived from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockSize {
    #[default]
    Auto,
    Fixed(NonZeroUsize),
}

impl BlockSize {
    /// `Fixed(size)`, or `Auto` when `size` is zero.
    pub fn fixed(size: usize) -> Self {
        NonZeroUsize::new(size).map_or(Self::Auto, Self::Fixed)
    }

    /// The fixed size, or `default()` clamped to at least 1.
    pub fn resolve(self, default: impl FnOnce() -> usize) -> usize {
        match self {
            Self::Fixed(size) => size.get(),
            Self::Auto => default().max(1),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("-1"),
            Self::Fixed(size) => write!(f, "{size}"),
        }
    }
}

/// Parsed identity of a configured solver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolverLabel {
    pub name: String,
    pub workers: usize,
    /// Block sizes in the solver's parameter order; missing entries are `Auto`.
    pub sizes: Vec<BlockSize>,
}

impl SolverLabel {
    pub fn new(name: impl Into<String>, workers: usize, sizes: &[BlockSize]) -> Self {
        let mut sizes = sizes.to_vec();
        while sizes.last().is_some_and(BlockSize::is_auto) {
            sizes.pop();
        }
        Self {
            name: name.into(),
            workers,
            sizes,
        }
    }

    /// The `index`-th block size, `Auto` when not given.
    pub fn size(&self, index: usize) -> BlockSize {
        self.sizes.get(index).copied().unwrap_or_default()
    }
}

impl fmt::Display for SolverLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}", self.name, self.workers)?;
        for size in &self.sizes {
            write!(f, ",{size}")?;
        }
        f.write_str("]")
    }
}

impl FromStr for SolverLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = LABEL_RE
            .captures(s.trim())
            .ok_or_else(|| LabelError::Malformed(s.to_string()))?;

        let workers: usize = caps[2]
            .parse()
            .map_err(|_| LabelError::Malformed(s.to_string()))?;
        if workers == 0 {
            return Err(LabelError::ZeroWorkers(s.to_string()));
        }

        let sizes = [caps.get(3), caps.get(4)]
            .into_iter()
            .flatten()
            .map(|m| parse_size(s, m.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(&caps[1], workers, &sizes))
    }
}

fn parse_size(label: &str, raw: &str) -> Result<BlockSize, LabelError> {
    let value: i64 = raw
        .parse()
        .map_err(|_| LabelError::Malformed(label.to_string()))?;
    match value {
        -1 => Ok(BlockSize::Auto),
        v if v > 0 => usize::try_from(v)
            .map(BlockSize::fixed)
            .map_err(|_| LabelError::Malformed(label.to_string())),
        v => Err(LabelError::InvalidSize {
            label: label.to_string(),
            value: v,
        }),
    }
}
