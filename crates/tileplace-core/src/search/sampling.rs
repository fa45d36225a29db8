//! Candidate sampling for the placement search.

use crate::grid::{overlaps, Position};
use rand::seq::index;
use rand::Rng;

/// Where a sample's positions are drawn from
#[derive(Debug, Clone, Copy)]
pub enum SamplePool<'a> {
    /// Uniformly from every valid position
    Uniform(&'a [Position]),
    /// From positions near the baseline path; any shortfall comes from `rest`
    PathBiased {
        nearby: &'a [Position],
        rest: &'a [Position],
    },
}

impl SamplePool<'_> {
    /// Draw `k` distinct positions in random order, or `None` if the pool is too small
    pub fn draw<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Option<Vec<Position>> {
        match *self {
            SamplePool::Uniform(all) => choose(all, k, rng),
            SamplePool::PathBiased { nearby, rest } => {
                if nearby.len() >= k {
                    return choose(nearby, k, rng);
                }
                let mut selected = nearby.to_vec();
                selected.extend(choose(rest, k - nearby.len(), rng)?);
                Some(selected)
            }
        }
    }
}

fn choose<R: Rng + ?Sized>(from: &[Position], k: usize, rng: &mut R) -> Option<Vec<Position>> {
    if from.len() < k {
        return None;
    }
    Some(index::sample(rng, from.len(), k).into_iter().map(|i| from[i]).collect())
}

/// Draw `k` tiles with pairwise-disjoint footprints, redrawing on overlap.
///
/// Gives up after `max_retries` draws, or at once when the pool cannot supply `k`.
pub fn sample_non_overlapping<R: Rng + ?Sized>(
    pool: SamplePool<'_>,
    k: usize,
    max_retries: usize,
    rng: &mut R,
) -> Option<Vec<Position>> {
    for _ in 0..max_retries {
        let selected = pool.draw(k, rng)?;
        if !overlaps(&selected) {
            return Some(selected);
        }
    }
    None
}
