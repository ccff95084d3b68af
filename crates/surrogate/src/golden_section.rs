//! Golden section line search over a closed interval.
//!
//! The search keeps two interior probes placed by the golden ratio and
//! discards the part of the bracket beyond the worse probe, reusing the
//! surviving probe so each iteration costs one evaluation. It assumes the
//! objective is unimodal on the bracket; otherwise it returns a local
//! optimum.
//!
//! Non-finite objective values (for example a likelihood that could not be
//! evaluated) are treated as worse than any finite value, so the bracket
//! shrinks away from them.

mod bracket;
mod config;
mod search;

#[cfg(test)]
mod tests;

pub use config::{Config, ConfigError};

use search::search;

/// Indicates whether the search converged or hit the iteration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The bracket shrank below the configured tolerance.
    Converged,

    /// Reached the iteration limit first.
    MaxIters,
}

/// The best point a line search evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Final search status.
    pub status: Status,

    /// Location of the best evaluated point.
    pub x: f64,

    /// Objective at `x`, untransformed.
    pub objective: f64,

    /// Number of shrink iterations performed.
    pub iters: usize,
}

/// Finds the minimum of `f` on `bracket`.
///
/// The bracket bounds may be given in either order.
pub fn minimize<F>(f: F, bracket: [f64; 2], config: &Config) -> Solution
where
    F: FnMut(f64) -> f64,
{
    search(f, bracket, config, |v| v)
}

/// Finds the maximum of `f` on `bracket`.
///
/// The bracket bounds may be given in either order.
pub fn maximize<F>(f: F, bracket: [f64; 2], config: &Config) -> Solution
where
    F: FnMut(f64) -> f64,
{
    search(f, bracket, config, |v| -v)
}
