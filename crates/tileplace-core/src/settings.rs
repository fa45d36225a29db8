//! Solver settings, strategy selection and the request-to-response pipeline.

use crate::board::GameRequest;
use crate::report::{find_optimal_tile_placement, PlacementReport};
use crate::search::{Optimizer, SearchConfig};
use crate::Result;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Instant;

/// Search strategy requested by the caller.
///
/// Only `Optimal` is a distinct algorithm. `Greedy` is the same search on
/// half the budget; `Genetic` and `Simulated` are placeholders for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Algorithm {
    #[default]
    Optimal,
    Greedy,
    Genetic,
    Simulated,
}

impl Algorithm {
    pub fn all() -> &'static [Algorithm] {
        &[
            Algorithm::Optimal,
            Algorithm::Greedy,
            Algorithm::Genetic,
            Algorithm::Simulated,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Optimal => "optimal",
            Algorithm::Greedy => "greedy",
            Algorithm::Genetic => "genetic",
            Algorithm::Simulated => "simulated",
        }
    }

    /// Parse a strategy name, treating anything unrecognised as `Optimal`
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Per-combination attempt budget this strategy runs with
    pub fn attempt_budget(&self, max_iterations: usize) -> usize {
        match self {
            Algorithm::Greedy => max_iterations / 2,
            _ => max_iterations,
        }
    }

    /// Whether the name is accepted but backed by the optimal search
    pub fn is_stub(&self) -> bool {
        !matches!(self, Algorithm::Optimal)
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Algorithm::all()
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown algorithm: {}", s))
    }
}

impl From<String> for Algorithm {
    fn from(name: String) -> Self {
        Algorithm::from_name(&name)
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Knobs supplied alongside a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub max_iterations: usize,
    pub random_seed: u64,
    pub algorithm: Algorithm,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            random_seed: 42,
            algorithm: Algorithm::Optimal,
        }
    }
}

impl SolverSettings {
    /// Seeded optimizer configured for the chosen strategy
    pub fn optimizer(&self) -> Optimizer {
        if self.algorithm.is_stub() {
            warn!(
                "{} algorithm not yet implemented, using optimal",
                self.algorithm
            );
        }
        let budget = self.algorithm.attempt_budget(self.max_iterations);
        Optimizer::with_config(
            SearchConfig::with_max_attempts(budget),
            StdRng::seed_from_u64(self.random_seed),
        )
    }
}

/// Report plus the run metadata returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    #[serde(flatten)]
    pub report: PlacementReport,
    pub time_taken: String,
    pub algorithm_used: Algorithm,
    pub iterations_used: usize,
    pub random_seed_used: u64,
}

/// Build the grid from `request`, optimize it, and attach run metadata
pub fn solve(request: &GameRequest) -> Result<SolveResponse> {
    let settings = &request.solver_settings;
    info!(
        "solver settings: algorithm={}, max_iter={}, seed={}",
        settings.algorithm, settings.max_iterations, settings.random_seed
    );

    let problem = request.to_problem()?;
    let mut optimizer = settings.optimizer();

    let started = Instant::now();
    let report = find_optimal_tile_placement(
        &problem.grid,
        problem.max_normal,
        problem.max_frozen,
        &mut optimizer,
    )?;
    let time_taken = format!("{:.3}s", started.elapsed().as_secs_f64());
    info!(
        "solution found in {} using {} algorithm, improvement {}",
        time_taken, settings.algorithm, report.improvement
    );

    Ok(SolveResponse {
        report,
        time_taken,
        algorithm_used: settings.algorithm,
        iterations_used: settings.max_iterations,
        random_seed_used: settings.random_seed,
    })
}
