//! Shortest start-to-end route and diagonal path straightening.

use crate::grid::{Cell, Grid, Position};
use std::collections::VecDeque;

/// Neighbour expansion order: right, left, down, up.
/// Several shortest routes can exist; fixing the order fixes which one wins.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// A shortest route through the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Number of orthogonal steps
    pub distance: usize,
    /// Cells from a start cell to the first end cell reached, 4-adjacent
    pub path: Vec<Position>,
}

impl Route {
    /// The path with orthogonal corner pairs merged into diagonal steps
    pub fn straightened(&self) -> Vec<Position> {
        optimize_diagonal_path(&self.path)
    }
}

/// Multi-source BFS from every start cell to the nearest end cell.
///
/// Returns `None` when no end cell is reachable.
pub fn shortest_path(grid: &Grid) -> Option<Route> {
    let (height, width) = (grid.height(), grid.width());
    let mut visited = vec![false; height * width];
    let mut parent: Vec<Option<usize>> = vec![None; height * width];
    let mut queue = VecDeque::new();

    for (pos, cell) in grid.iter() {
        if cell == Cell::Start {
            let idx = pos.row * width + pos.col;
            visited[idx] = true;
            queue.push_back((pos, 0usize));
        }
    }

    while let Some((pos, dist)) = queue.pop_front() {
        if grid.get(pos) == Cell::End {
            let mut path = Vec::with_capacity(dist + 1);
            let mut current = Some(pos.row * width + pos.col);
            while let Some(idx) = current {
                path.push(Position::new(idx / width, idx % width));
                current = parent[idx];
            }
            path.reverse();
            return Some(Route {
                distance: dist,
                path,
            });
        }

        for (dr, dc) in DIRECTIONS {
            let (Some(nr), Some(nc)) = (
                pos.row.checked_add_signed(dr),
                pos.col.checked_add_signed(dc),
            ) else {
                continue;
            };
            if !grid.in_bounds(nr, nc) {
                continue;
            }
            let next = Position::new(nr, nc);
            let idx = nr * width + nc;
            if visited[idx] || grid.get(next).is_obstacle() {
                continue;
            }
            visited[idx] = true;
            parent[idx] = Some(pos.row * width + pos.col);
            queue.push_back((next, dist + 1));
        }
    }

    None
}

/// Replace pairs of orthogonal steps on different axes with one diagonal step.
///
/// Single left-to-right pass: on a merge the middle point is dropped and the
/// scan skips ahead by two. The final point is always kept.
pub fn optimize_diagonal_path(path: &[Position]) -> Vec<Position> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let step = |a: Position, b: Position| {
        (
            b.row as isize - a.row as isize,
            b.col as isize - a.col as isize,
        )
    };

    let mut optimized = vec![path[0]];
    let mut i = 1;
    while i < path.len() - 1 {
        let (dr1, dc1) = step(path[i - 1], path[i]);
        let (dr2, dc2) = step(path[i], path[i + 1]);

        if dr1.abs() + dc1.abs() == 1 && dr2.abs() + dc2.abs() == 1 && dr1 != dr2 && dc1 != dc2 {
            optimized.push(path[i + 1]);
            i += 2;
        } else {
            optimized.push(path[i]);
            i += 1;
        }
    }

    if i == path.len() - 1 {
        optimized.push(path[path.len() - 1]);
    }

    optimized
}
