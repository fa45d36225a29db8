use crate::grid::{Grid, Position};
use crate::score::score;
use crate::search::Optimizer;
use crate::{Error, Result};
use log::info;
use serde::{Deserialize, Serialize};

/// Outcome of one optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub original_score: f64,
    pub best_score: f64,
    /// `best_score - original_score`, never negative
    pub improvement: f64,
    /// Top-left corners of the placed normal tiles
    pub normal_positions: Vec<Position>,
    /// Top-left corners of the placed frozen tiles
    pub frozen_positions: Vec<Position>,
    /// Resulting board; not part of the serialized record
    #[serde(skip)]
    pub best_grid: Option<Grid>,
}

impl PlacementReport {
    /// Report for a run that leaves the board untouched
    fn unchanged(grid: &Grid, original_score: f64) -> Self {
        Self {
            original_score,
            best_score: original_score,
            improvement: 0.0,
            normal_positions: Vec::new(),
            frozen_positions: Vec::new(),
            best_grid: Some(grid.clone()),
        }
    }

    pub fn tiles_placed(&self) -> usize {
        self.normal_positions.len() + self.frozen_positions.len()
    }
}

/// Run the optimizer on `grid` and package the outcome.
///
/// A configuration scoring below the untouched board is never reported;
/// the untouched board is reported instead.
pub fn find_optimal_tile_placement(
    grid: &Grid,
    k_normal: usize,
    l_frozen: usize,
    optimizer: &mut Optimizer,
) -> Result<PlacementReport> {
    let original_score = score(grid, &optimizer.config().score).ok_or(Error::NoRoute)?;
    info!(
        "original score {}, placing up to {} normal and {} frozen tiles",
        original_score, k_normal, l_frozen
    );

    let report = match optimizer.optimize(grid, k_normal, l_frozen)? {
        Some(best) if best.score >= original_score => PlacementReport {
            original_score,
            best_score: best.score,
            improvement: best.score - original_score,
            normal_positions: best.normal_positions,
            frozen_positions: best.frozen_positions,
            best_grid: Some(best.grid),
        },
        _ => PlacementReport::unchanged(grid, original_score),
    };
    Ok(report)
}
