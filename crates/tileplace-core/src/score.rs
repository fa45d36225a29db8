//! Path quality scoring.
//!
//! Travel near frozen tiles earns a flat per-step bonus for a window of
//! steps; everywhere else a step costs its geometric length.

use crate::grid::{l2norm, Grid};
use crate::path::shortest_path;
use serde::{Deserialize, Serialize};

/// Scoring constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreParams {
    /// A path point strictly closer than this to a frozen tile centre is "in the frost"
    pub frozen_radius: f64,
    /// Steps of bonus credit granted per frozen-adjacent point, and the initial credit
    pub frozen_bonus_duration: i64,
    pub base_tile_cost: f64,
    /// Multiplier applied to `base_tile_cost` for a step taken with credit
    pub frozen_tile_cost: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            frozen_radius: 3.0,
            frozen_bonus_duration: 5,
            base_tile_cost: 1.0,
            frozen_tile_cost: 2.0,
        }
    }
}

/// Score the grid's straightened shortest path.
///
/// Returns `None` when the grid has no route.
pub fn score(grid: &Grid, params: &ScoreParams) -> Option<f64> {
    let route = shortest_path(grid)?;
    let path = route.straightened();
    let frozen = grid.frozen_tile_centers();

    let mut credit = params.frozen_bonus_duration;
    let mut total = 0.0;
    for (i, pos) in path.iter().enumerate() {
        let point = pos.as_point();
        if frozen
            .iter()
            .any(|&center| l2norm(center, point) < params.frozen_radius)
        {
            credit += params.frozen_bonus_duration;
        }

        if credit > 0 {
            total += params.base_tile_cost * params.frozen_tile_cost;
            credit -= 1;
        } else if i > 0 {
            total += params.base_tile_cost * l2norm(path[i - 1].as_point(), point);
        }
    }
    Some(total)
}
