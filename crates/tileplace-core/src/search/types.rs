//! Search configuration, tile-count combinations, and best-so-far tracking.

use crate::grid::{Grid, Position};
use crate::score::ScoreParams;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Heuristic knobs of the placement search. Defaults are the reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Attempts for each combination in the first third of the ordered list
    pub max_attempts: usize,
    pub score: ScoreParams,
    /// Tile centres within this distance of the baseline path count as path-nearby
    pub path_proximity: f64,
    /// Redraws allowed when a sample has overlapping tiles
    pub max_overlap_retries: usize,
    /// Share of attempts that are path-biased when the path phase is used
    pub path_share: f64,
    /// Share reserved (and not spent) for the path phase when it cannot be used
    pub fallback_path_share: f64,
    /// A combination stops sampling once its best exceeds this multiple of the baseline
    pub early_stop_factor: f64,
    /// The whole search stops once the best exceeds this multiple of the early-stop threshold
    pub exceptional_factor: f64,
    /// A combination below this fraction of the all-time best switches thinning on
    pub prune_factor: f64,
    /// Thinning is only considered for combination indices above this
    pub prune_after: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2000,
            score: ScoreParams::default(),
            path_proximity: 4.0,
            max_overlap_retries: 5,
            path_share: 0.7,
            fallback_path_share: 0.3,
            early_stop_factor: 1.5,
            exceptional_factor: 1.2,
            prune_factor: 0.8,
            prune_after: 5,
        }
    }
}

impl SearchConfig {
    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Attempt budget for the combination at `index` of `total`
    pub fn combination_budget(&self, index: usize, total: usize) -> usize {
        if index < total / 3 {
            self.max_attempts
        } else if index < 2 * total / 3 {
            self.max_attempts / 2
        } else {
            self.max_attempts / 4
        }
    }

    /// Path-biased and uniform attempts for one combination's `budget`.
    ///
    /// Without the path phase its share is still held back, so only the
    /// uniform remainder runs.
    pub fn attempt_split(&self, budget: usize, use_path: bool) -> (usize, usize) {
        if use_path {
            let path = (budget as f64 * self.path_share) as usize;
            (path, budget - path)
        } else {
            let reserved = (budget as f64 * self.fallback_path_share) as usize;
            (0, budget - reserved)
        }
    }

    /// Score a combination must exceed to stop sampling early
    pub fn early_stop_threshold(&self, baseline: f64) -> f64 {
        baseline * self.early_stop_factor
    }

    /// Whether `best` is good enough to end the whole search
    pub fn is_exceptional(&self, best: f64, threshold: f64) -> bool {
        best > threshold * self.exceptional_factor
    }
}

/// Skips every other remaining combination once one underperforms.
/// Heuristic: later combinations are not guaranteed to be explored.
#[derive(Debug, Default)]
pub(crate) struct Thinning {
    start: Option<usize>,
}

impl Thinning {
    pub fn skips(&self, idx: usize) -> bool {
        self.start
            .is_some_and(|start| idx > start && (idx - start) % 2 == 1)
    }

    /// Switch thinning on if the combination at `idx` fell short of the overall best
    pub fn observe(
        &mut self,
        idx: usize,
        combo_best: f64,
        overall_best: f64,
        config: &SearchConfig,
    ) -> bool {
        if self.start.is_none()
            && idx > config.prune_after
            && combo_best < overall_best * config.prune_factor
        {
            self.start = Some(idx);
            true
        } else {
            false
        }
    }
}

/// Number of normal and frozen tiles explored together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Combination {
    pub normal: usize,
    pub frozen: usize,
}

impl Combination {
    pub fn new(normal: usize, frozen: usize) -> Self {
        Self { normal, frozen }
    }

    pub fn total(&self) -> usize {
        self.normal + self.frozen
    }

    /// Every split within the limits, largest totals first, then the most
    /// balanced split. Ties keep generation order (fewer normal tiles first).
    pub fn enumerate(
        max_normal: usize,
        max_frozen: usize,
        valid_count: usize,
    ) -> Vec<Combination> {
        let max_total = (max_normal + max_frozen).min(valid_count);
        let mut combos = Vec::new();
        for total in 1..=max_total {
            for normal in 0..=max_normal.min(total) {
                let frozen = total - normal;
                if frozen <= max_frozen {
                    combos.push(Combination::new(normal, frozen));
                }
            }
        }
        combos.sort_by_key(|c| (Reverse(c.total()), Reverse(c.normal.min(c.frozen))));
        combos
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}N + {}F", self.normal, self.frozen)
    }
}

/// A scored tile configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub grid: Grid,
    pub score: f64,
    pub normal_positions: Vec<Position>,
    pub frozen_positions: Vec<Position>,
    pub combination: Combination,
}

/// Running best of a search scope (one combination, or the whole run)
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    best: Option<Placement>,
}

impl Accumulator {
    pub fn best_score(&self) -> f64 {
        self.best.as_ref().map_or(f64::NEG_INFINITY, |p| p.score)
    }

    /// Keep `score` if it strictly beats the current best. The placement is
    /// only built on acceptance.
    pub fn offer(&mut self, score: f64, build: impl FnOnce() -> Placement) -> bool {
        if score > self.best_score() {
            self.best = Some(build());
            true
        } else {
            false
        }
    }

    /// Merge another scope's best into this one
    pub fn absorb(&mut self, other: Accumulator) -> bool {
        match other.best {
            Some(p) if p.score > self.best_score() => {
                self.best = Some(p);
                true
            }
            _ => false,
        }
    }

    pub fn best(&self) -> Option<&Placement> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<Placement> {
        self.best
    }
}
