//! Placement search.
//!
//! Walks (normal, frozen) tile-count combinations from the largest down,
//! sampling non-overlapping placements for each one under a decaying attempt
//! budget, and keeps the best-scoring configuration.

mod sampling;
mod types;

pub use sampling::{sample_non_overlapping, SamplePool};
pub use types::{Combination, Placement, SearchConfig};

use crate::grid::{l2norm, Cell, Grid, Position};
use crate::path::shortest_path;
use crate::score::score;
use crate::{Error, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use types::{Accumulator, Thinning};

/// Randomized tile placement optimizer. Owns its RNG; all search state is per call.
pub struct Optimizer {
    config: SearchConfig,
    rng: StdRng,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only inputs shared by every attempt of one run
struct SearchContext<'a> {
    base: &'a Grid,
    valid: &'a [Position],
    nearby: &'a [Position],
    rest: &'a [Position],
}

/// Reusable copy of the base grid; tiles are painted for one attempt and cleared after.
struct Workspace {
    grid: Grid,
}

impl Workspace {
    fn evaluate(
        &mut self,
        sample: &[Position],
        combo: Combination,
        config: &SearchConfig,
        acc: &mut Accumulator,
    ) {
        let (normal, frozen) = sample.split_at(combo.normal);
        for &pos in normal {
            self.grid.paint_tile(pos, Cell::PlacedNormal);
        }
        for &pos in frozen {
            self.grid.paint_tile(pos, Cell::PlacedFrozen);
        }

        if let Some(s) = score(&self.grid, &config.score) {
            acc.offer(s, || Placement {
                grid: self.grid.clone(),
                score: s,
                normal_positions: normal.to_vec(),
                frozen_positions: frozen.to_vec(),
                combination: combo,
            });
        }

        for &pos in sample {
            self.grid.clear_tile(pos);
        }
    }
}

impl Optimizer {
    /// Optimizer with default config, seeded from OS entropy
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default(), StdRng::from_entropy())
    }

    /// Optimizer with default config and a fixed seed for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(SearchConfig::default(), StdRng::seed_from_u64(seed))
    }

    pub fn with_config(config: SearchConfig, rng: StdRng) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }

    /// Search for the best placement of up to `max_normal` normal and
    /// `max_frozen` frozen tiles on `base`.
    ///
    /// Fails with [`Error::NoRoute`] if the base grid has no route. Returns
    /// `Ok(None)` if no sampled configuration kept a route.
    pub fn optimize(
        &mut self,
        base: &Grid,
        max_normal: usize,
        max_frozen: usize,
    ) -> Result<Option<Placement>> {
        base.validate_base()?;
        let Some(baseline) = score(base, &self.config.score) else {
            warn!("grid has no valid path");
            return Err(Error::NoRoute);
        };

        let valid = base.valid_top_left_positions();
        if valid.is_empty() {
            warn!("no valid positions for tile placement");
            return Ok(Some(Placement {
                grid: base.clone(),
                score: baseline,
                normal_positions: Vec::new(),
                frozen_positions: Vec::new(),
                combination: Combination::default(),
            }));
        }

        let nearby = self.path_nearby_positions(base, &valid);
        let rest: Vec<Position> = valid
            .iter()
            .copied()
            .filter(|p| !nearby.contains(p))
            .collect();
        let ctx = SearchContext {
            base,
            valid: &valid,
            nearby: &nearby,
            rest: &rest,
        };

        let combos = Combination::enumerate(max_normal, max_frozen, valid.len());
        debug!(
            "baseline score {}, {} valid positions ({} near path), {} combinations",
            baseline,
            valid.len(),
            nearby.len(),
            combos.len()
        );

        let threshold = self.config.early_stop_threshold(baseline);
        let mut overall = Accumulator::default();
        let mut thinning = Thinning::default();

        for (idx, &combo) in combos.iter().enumerate() {
            if thinning.skips(idx) {
                debug!("thinning: skipping combination {} ({})", idx + 1, combo);
                continue;
            }

            let budget = self.config.combination_budget(idx, combos.len());
            debug!(
                "combination {}/{}: {} ({} attempts)",
                idx + 1,
                combos.len(),
                combo,
                budget
            );

            let combo_acc = self.search_combination(&ctx, combo, budget, threshold);
            let combo_best = combo_acc.best_score();

            if overall.absorb(combo_acc) {
                info!("new best: {}, score {}", combo, combo_best);
                if self.config.is_exceptional(overall.best_score(), threshold) {
                    info!("exceptional solution found, terminating search early");
                    break;
                }
            }

            if thinning.observe(idx, combo_best, overall.best_score(), &self.config) {
                debug!("pruning: combinations underperforming, skipping every other one");
            }
        }

        match overall.best() {
            Some(best) => info!(
                "final best combination {}, score {} (improvement {})",
                best.combination,
                best.score,
                best.score - baseline
            ),
            None => info!("no valid placement found"),
        }
        Ok(overall.into_best())
    }

    /// Valid positions whose tile centre lies near the baseline path
    fn path_nearby_positions(&self, base: &Grid, valid: &[Position]) -> Vec<Position> {
        let Some(route) = shortest_path(base) else {
            return Vec::new();
        };
        if route.distance == 0 {
            return Vec::new();
        }
        let path = route.straightened();
        valid
            .iter()
            .copied()
            .filter(|pos| {
                let center = pos.tile_center();
                path.iter()
                    .any(|p| l2norm(center, p.as_point()) <= self.config.path_proximity)
            })
            .collect()
    }

    fn search_combination(
        &mut self,
        ctx: &SearchContext<'_>,
        combo: Combination,
        budget: usize,
        threshold: f64,
    ) -> Accumulator {
        let total = combo.total();
        let use_path = ctx.nearby.len() >= total && total > 1;
        let (path_attempts, random_attempts) = self.config.attempt_split(budget, use_path);

        let mut acc = Accumulator::default();
        let mut workspace = Workspace {
            grid: ctx.base.clone(),
        };

        if use_path {
            let pool = SamplePool::PathBiased {
                nearby: ctx.nearby,
                rest: ctx.rest,
            };
            self.run_attempts(pool, path_attempts, combo, threshold, &mut workspace, &mut acc);
            if acc.best_score() > threshold {
                return acc;
            }
        }
        self.run_attempts(
            SamplePool::Uniform(ctx.valid),
            random_attempts,
            combo,
            threshold,
            &mut workspace,
            &mut acc,
        );
        acc
    }

    fn run_attempts(
        &mut self,
        pool: SamplePool<'_>,
        attempts: usize,
        combo: Combination,
        threshold: f64,
        workspace: &mut Workspace,
        acc: &mut Accumulator,
    ) {
        for _ in 0..attempts {
            let sample = sample_non_overlapping(
                pool,
                combo.total(),
                self.config.max_overlap_retries,
                &mut self.rng,
            );
            if let Some(sample) = sample {
                workspace.evaluate(&sample, combo, &self.config, acc);
            }

            if acc.best_score() > threshold {
                debug!("early termination for {}: score {}", combo, acc.best_score());
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScoreParams;

    fn open_board() -> Grid {
        Grid::from_string(
            "
            S.........
            ..........
            ..........
            ..........
            ..........
            .........E
            ",
        )
        .unwrap()
    }

    #[test]
    fn test_no_route_fails_before_search() {
        let grid = Grid::from_string(
            "
            S.N...
            ..N...
            NNN..E
            ",
        )
        .unwrap();
        let mut opt = Optimizer::with_seed(1);
        assert!(matches!(opt.optimize(&grid, 2, 2), Err(Error::NoRoute)));
    }

    #[test]
    fn test_rejects_placed_tiles_in_base() {
        let grid = Grid::from_string("S...\n.nn.\n.nnE").unwrap();
        let mut opt = Optimizer::with_seed(1);
        assert!(matches!(
            opt.optimize(&grid, 1, 0),
            Err(Error::PlacedTileInBase { .. })
        ));
    }

    #[test]
    fn test_no_valid_positions_returns_base() {
        let grid = Grid::from_string("S..E").unwrap();
        let mut opt = Optimizer::with_seed(1);
        let best = opt.optimize(&grid, 3, 3).unwrap().unwrap();
        assert_eq!(best.grid, grid);
        assert_eq!(best.score, score(&grid, &ScoreParams::default()).unwrap());
        assert!(best.normal_positions.is_empty());
        assert!(best.frozen_positions.is_empty());
    }

    #[test]
    fn test_zero_tiles_finds_nothing() {
        let mut opt = Optimizer::with_seed(1);
        assert_eq!(opt.optimize(&open_board(), 0, 0).unwrap(), None);
    }

    #[test]
    fn test_placement_is_consistent_with_grid() {
        let base = open_board();
        let mut opt = Optimizer::with_config(
            SearchConfig::with_max_attempts(200),
            StdRng::seed_from_u64(11),
        );
        let best = opt.optimize(&base, 2, 2).unwrap().unwrap();

        let mut tiles = best.normal_positions.clone();
        tiles.extend(&best.frozen_positions);
        assert!(!crate::grid::overlaps(&tiles));
        assert_eq!(best.normal_positions.len(), best.combination.normal);
        assert_eq!(best.frozen_positions.len(), best.combination.frozen);

        for &p in &best.normal_positions {
            assert!(base.can_place(p.row, p.col));
            assert!(p.footprint().iter().all(|&c| best.grid.get(c) == Cell::PlacedNormal));
        }
        for &p in &best.frozen_positions {
            assert!(base.can_place(p.row, p.col));
            assert!(p.footprint().iter().all(|&c| best.grid.get(c) == Cell::PlacedFrozen));
        }
        let placed = best.grid.iter().filter(|(_, c)| c.is_placed()).count();
        assert_eq!(placed, 4 * tiles.len());
        for (pos, cell) in base.iter() {
            if !best.grid.get(pos).is_placed() {
                assert_eq!(best.grid.get(pos), cell);
            }
        }
        assert_eq!(score(&best.grid, &opt.config().score), Some(best.score));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let base = open_board();
        let run = |seed| {
            let mut opt = Optimizer::with_config(
                SearchConfig::with_max_attempts(120),
                StdRng::seed_from_u64(seed),
            );
            opt.optimize(&base, 2, 1).unwrap()
        };
        assert_eq!(run(42), run(42));
    }

    /// First routable sample `pool` yields for `combo` from a fresh `seed` stream
    fn first_routable_sample(
        base: &Grid,
        pool: SamplePool<'_>,
        combo: Combination,
        seed: u64,
    ) -> (Vec<Position>, Vec<Position>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let retries = SearchConfig::default().max_overlap_retries;
        loop {
            let Some(sample) = sample_non_overlapping(pool, combo.total(), retries, &mut rng)
            else {
                continue;
            };
            let (normal, frozen) = sample.split_at(combo.normal);
            let mut grid = base.clone();
            normal.iter().for_each(|&p| grid.paint_tile(p, Cell::PlacedNormal));
            frozen.iter().for_each(|&p| grid.paint_tile(p, Cell::PlacedFrozen));
            if score(&grid, &ScoreParams::default()).is_some() {
                return (normal.to_vec(), frozen.to_vec());
            }
        }
    }

    fn stop_at_first_success(opt: &mut Optimizer) {
        let config = opt.config_mut();
        config.early_stop_factor = 0.0;
        config.exceptional_factor = 0.0;
    }

    #[test]
    fn test_path_nearby_positions() {
        let grid = Grid::from_string(
            "
            S.....E
            .......
            .......
            .......
            .......
            .......
            ",
        )
        .unwrap();
        let valid = grid.valid_top_left_positions();
        let mut expected: Vec<Position> = (1..=4).map(|c| Position::new(0, c)).collect();
        for row in 1..=3 {
            expected.extend((0..=5).map(|c| Position::new(row, c)));
        }

        let mut opt = Optimizer::with_seed(1);
        assert_eq!(opt.path_nearby_positions(&grid, &valid), expected);

        // Row 3 centres sit exactly sqrt(12.5) from the path; the bound is inclusive
        opt.config_mut().path_proximity = 12.5f64.sqrt();
        assert_eq!(opt.path_nearby_positions(&grid, &valid), expected);
        opt.config_mut().path_proximity = 12.5f64.sqrt() - 1e-9;
        let without_row_3 = opt.path_nearby_positions(&grid, &valid);
        assert_eq!(without_row_3, expected[..expected.len() - 6].to_vec());
    }

    #[test]
    fn test_early_stop_ends_run_after_first_combination() {
        let base = open_board();
        let mut opt = Optimizer::with_seed(3);
        stop_at_first_success(&mut opt);
        let best = opt.optimize(&base, 2, 2).unwrap().unwrap();
        assert_eq!(best.combination, Combination::new(2, 2));

        // The path-biased phase succeeded first, so its sample is the result
        let valid = base.valid_top_left_positions();
        let nearby = opt.path_nearby_positions(&base, &valid);
        let rest: Vec<Position> = valid
            .iter()
            .copied()
            .filter(|p| !nearby.contains(p))
            .collect();
        let pool = SamplePool::PathBiased {
            nearby: &nearby,
            rest: &rest,
        };
        let (normal, frozen) = first_routable_sample(&base, pool, best.combination, 3);
        assert_eq!(best.normal_positions, normal);
        assert_eq!(best.frozen_positions, frozen);
    }

    #[test]
    fn test_single_tile_skips_path_phase() {
        let base = open_board();
        let mut opt = Optimizer::with_seed(9);
        stop_at_first_success(&mut opt);
        let best = opt.optimize(&base, 1, 0).unwrap().unwrap();

        let valid = base.valid_top_left_positions();
        let (normal, frozen) =
            first_routable_sample(&base, SamplePool::Uniform(&valid), best.combination, 9);
        assert_eq!(best.combination, Combination::new(1, 0));
        assert_eq!(best.normal_positions, normal);
        assert!(frozen.is_empty());
    }

    #[test]
    fn test_thinning_skips_alternate_combinations() {
        let base = open_board();
        let mut opt = Optimizer::with_config(
            SearchConfig::with_max_attempts(30),
            StdRng::seed_from_u64(4),
        );
        let config = opt.config_mut();
        config.early_stop_factor = f64::INFINITY;
        config.prune_after = 0;
        config.prune_factor = f64::INFINITY;

        // Thinning starts at index 1 of the 2N + 2F order, so indices 2, 4, 6 never run
        let skipped = [
            Combination::new(2, 1),
            Combination::new(0, 2),
            Combination::new(0, 1),
        ];
        let best = opt.optimize(&base, 2, 2).unwrap().unwrap();
        assert!(!skipped.contains(&best.combination));
    }

    #[test]
    fn test_sole_site_is_used() {
        let grid = Grid::from_string(
            "
            S....E
            ..NNNN
            ..NNNN
            ",
        )
        .unwrap();
        assert_eq!(grid.valid_top_left_positions(), vec![Position::new(1, 0)]);
        let mut opt = Optimizer::with_seed(5);
        let best = opt.optimize(&grid, 1, 0).unwrap().unwrap();
        assert_eq!(best.normal_positions, vec![Position::new(1, 0)]);
        assert!(best.frozen_positions.is_empty());
    }
}
