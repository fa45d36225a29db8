//! Basic example of using the tile placement optimizer

use tileplace_core::{
    find_optimal_tile_placement, score, shortest_path, Grid, Optimizer, ScoreParams,
};

fn main() {
    let grid = Grid::from_string(
        "
        S...........
        ............
        ....NN......
        ....NN..FF..
        ........FF..
        ...........E
        ",
    )
    .expect("demo board is well formed");

    println!("Board:");
    println!("{}", grid);

    if let Some(route) = shortest_path(&grid) {
        println!("Shortest route: {} steps", route.distance);
        println!("Straightened path: {:?}\n", route.straightened());
    }

    let params = ScoreParams::default();
    match score(&grid, &params) {
        Some(s) => println!("Baseline score: {:.3}\n", s),
        None => {
            println!("No route from start to end!");
            return;
        }
    }

    // Place up to two normal and one frozen tile, reproducibly
    let mut optimizer = Optimizer::with_seed(42);
    match find_optimal_tile_placement(&grid, 2, 1, &mut optimizer) {
        Ok(report) => {
            println!("Best score: {:.3}", report.best_score);
            println!("Improvement: {:.3}", report.improvement);
            println!("Normal tiles (top-left): {:?}", report.normal_positions);
            println!("Frozen tiles (top-left): {:?}", report.frozen_positions);
            if let Some(best) = &report.best_grid {
                println!("\nOptimized board:");
                println!("{}", best);
            }
        }
        Err(e) => println!("Optimization failed: {}", e),
    }
}
