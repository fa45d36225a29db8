//! End-to-end behaviour of the optimizer on small hand-built boards

use crate::{
    find_optimal_tile_placement, optimize_diagonal_path, score, shortest_path, Cell, Error, Grid,
    Optimizer, Position, ScoreParams, SearchConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn optimizer(seed: u64, attempts: usize) -> Optimizer {
    Optimizer::with_config(
        SearchConfig::with_max_attempts(attempts),
        StdRng::seed_from_u64(seed),
    )
}

fn towered_board() -> Grid {
    Grid::from_string(
        "
        SS..........
        ............
        ....NN......
        ....NN..FF..
        ........FF..
        ............
        ..NN........
        ..NN......EE
        ",
    )
    .unwrap()
}

fn sole_site_board() -> Grid {
    Grid::from_string(
        "
        S....E
        ..NNNN
        ..NNNN
        ",
    )
    .unwrap()
}

#[test]
fn test_same_seed_same_report() {
    let base = towered_board();
    let a = find_optimal_tile_placement(&base, 2, 2, &mut optimizer(2024, 150)).unwrap();
    let b = find_optimal_tile_placement(&base, 2, 2, &mut optimizer(2024, 150)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_score_none_iff_no_route() {
    let boards = [
        towered_board(),
        sole_site_board(),
        Grid::from_string("SNE").unwrap(),
        Grid::from_string("S..\nNNN\n..E").unwrap(),
        Grid::from_string("S...").unwrap(),
    ];
    for grid in &boards {
        assert_eq!(
            score(grid, &ScoreParams::default()).is_none(),
            shortest_path(grid).is_none(),
            "mismatch on\n{}",
            grid
        );
    }
}

#[test]
fn test_placed_tiles_never_overlap_anything() {
    let base = towered_board();
    for seed in 0..4 {
        let report = find_optimal_tile_placement(&base, 3, 2, &mut optimizer(seed, 100)).unwrap();
        let best = report.best_grid.as_ref().unwrap();
        let mut covered = Vec::new();
        for (&pos, kind) in report
            .normal_positions
            .iter()
            .map(|p| (p, Cell::PlacedNormal))
            .chain(report.frozen_positions.iter().map(|p| (p, Cell::PlacedFrozen)))
        {
            for cell in pos.footprint() {
                assert_eq!(base.get(cell), Cell::Empty, "tile over occupied cell {:?}", cell);
                assert_eq!(best.get(cell), kind);
                assert!(!covered.contains(&cell), "tiles share cell {:?}", cell);
                covered.push(cell);
            }
        }
        let placed = best.iter().filter(|(_, c)| c.is_placed()).count();
        assert_eq!(placed, covered.len());
    }
}

#[test]
fn test_report_never_worse_than_baseline() {
    let base = towered_board();
    for seed in 10..14 {
        let report = find_optimal_tile_placement(&base, 2, 1, &mut optimizer(seed, 80)).unwrap();
        assert!(report.best_score >= report.original_score);
        assert_eq!(report.improvement, report.best_score - report.original_score);
        if report.tiles_placed() == 0 {
            assert_eq!(report.best_grid.as_ref(), Some(&base));
            assert_eq!(report.best_score, report.original_score);
        }
    }
}

#[test]
fn test_straightening_bfs_paths_is_idempotent() {
    for grid in [towered_board(), sole_site_board()] {
        let route = shortest_path(&grid).unwrap();
        let once = optimize_diagonal_path(&route.path);
        assert_eq!(optimize_diagonal_path(&once), once);
    }
}

#[test]
fn test_no_tiles_requested() {
    let base = towered_board();
    let report = find_optimal_tile_placement(&base, 0, 0, &mut optimizer(1, 50)).unwrap();
    assert_eq!(report.best_grid.as_ref(), Some(&base));
    assert_eq!(report.improvement, 0.0);
    assert_eq!(report.tiles_placed(), 0);
}

#[test]
fn test_unreachable_board_fails_without_search() {
    let walled = Grid::from_string(
        "
        S.N.....
        ..N.....
        NNN....E
        ",
    )
    .unwrap();
    assert_eq!(score(&walled, &ScoreParams::default()), None);
    let result = find_optimal_tile_placement(&walled, 2, 2, &mut optimizer(1, 50));
    assert!(matches!(result, Err(Error::NoRoute)));
}

#[test]
fn test_single_legal_site_normal() {
    let base = sole_site_board();
    let report = find_optimal_tile_placement(&base, 1, 0, &mut optimizer(8, 40)).unwrap();
    assert_eq!(report.normal_positions, vec![Position::new(1, 0)]);
    assert!(report.frozen_positions.is_empty());
    assert_eq!(report.original_score, 11.0);
    assert_eq!(report.improvement, 0.0);
}

#[test]
fn test_single_legal_site_frozen() {
    let base = sole_site_board();
    let report = find_optimal_tile_placement(&base, 0, 1, &mut optimizer(8, 40)).unwrap();
    assert_eq!(report.frozen_positions, vec![Position::new(1, 0)]);
    assert_eq!(report.best_score, 12.0);
    assert_eq!(report.improvement, 1.0);
}

#[test]
fn test_frozen_tile_next_to_corridor_beats_normal_tile() {
    let corridor = Grid::from_string(
        "
        S........E
        ..........
        ..........
        ",
    )
    .unwrap();
    let params = ScoreParams::default();
    let frozen = corridor.place(1, 4, Cell::PlacedFrozen);
    let normal = corridor.place(1, 4, Cell::PlacedNormal);
    assert!(score(&frozen, &params).unwrap() > score(&normal, &params).unwrap());
}
