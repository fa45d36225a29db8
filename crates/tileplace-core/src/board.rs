//! Ingestion of the external board description into a [`Grid`].
//!
//! Coordinates arrive as `x` (column) / `y` (row). Start and end areas sit
//! just outside the board edge (`-1` or `width`/`height`) and are projected
//! onto the nearest border cells.

use crate::grid::{Cell, Grid, Position};
use crate::settings::SolverSettings;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

/// A pre-existing 2x2 tower anchored at its top-left corner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticTower {
    pub coord: Coord,
    /// Frozen ("clap") tower
    #[serde(default)]
    pub clap: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDescription {
    pub height: usize,
    pub width: usize,
    #[serde(default)]
    pub static_towers: Vec<StaticTower>,
    pub start_area: Vec<Coord>,
    pub end_area: Vec<Coord>,
}

/// A full solve request: board, tile allowance and solver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRequest {
    pub board: BoardDescription,
    /// Total tiles available, frozen ones included
    pub towers: usize,
    /// How many of `towers` are frozen
    pub claps: usize,
    #[serde(default)]
    pub solver_settings: SolverSettings,
}

/// Grid plus tile limits, ready for the optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    pub grid: Grid,
    pub max_normal: usize,
    pub max_frozen: usize,
}

impl GameRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_problem(&self) -> Result<Problem> {
        if self.claps > self.towers {
            return Err(Error::ClapsExceedTowers {
                towers: self.towers,
                claps: self.claps,
            });
        }
        Ok(Problem {
            grid: self.board.to_grid()?,
            max_normal: self.towers - self.claps,
            max_frozen: self.claps,
        })
    }
}

impl BoardDescription {
    pub fn to_grid(&self) -> Result<Grid> {
        if self.height == 0 || self.width == 0 {
            return Err(Error::EmptyGrid);
        }
        let mut grid = Grid::new(self.height, self.width);

        for tower in &self.static_towers {
            let Coord { x, y } = tower.coord;
            let fits = x >= 0
                && y >= 0
                && (x as usize) + 1 < self.width
                && (y as usize) + 1 < self.height;
            if !fits {
                return Err(Error::TowerOutOfBounds { x, y });
            }
            let kind = if tower.clap {
                Cell::FixedFrozen
            } else {
                Cell::FixedNormal
            };
            grid.paint_tile(Position::new(y as usize, x as usize), kind);
        }

        self.paint_area(&mut grid, &self.start_area, Cell::Start, "start")?;
        self.paint_area(&mut grid, &self.end_area, Cell::End, "end")?;
        Ok(grid)
    }

    fn clamp_col(&self, x: i64) -> usize {
        x.clamp(0, self.width as i64 - 1) as usize
    }

    fn clamp_row(&self, y: i64) -> usize {
        y.clamp(0, self.height as i64 - 1) as usize
    }

    /// Two coordinates describe a segment along one edge; anything else a corner
    fn paint_area(
        &self,
        grid: &mut Grid,
        area: &[Coord],
        kind: Cell,
        name: &'static str,
    ) -> Result<()> {
        let (Some(min_x), Some(max_x)) = (
            area.iter().map(|c| c.x).min(),
            area.iter().map(|c| c.x).max(),
        ) else {
            return Err(Error::EmptyArea(name));
        };
        let min_y = area.iter().map(|c| c.y).min().unwrap_or(0);
        let max_y = area.iter().map(|c| c.y).max().unwrap_or(0);
        let (w, h) = (self.width as i64, self.height as i64);

        if area.len() == 2 {
            if area.iter().any(|c| c.x == -1 || c.x == w) {
                let col = self.clamp_col(area[0].x);
                for row in self.clamp_row(min_y)..=self.clamp_row(max_y) {
                    grid.set(Position::new(row, col), kind);
                }
            }
            if area.iter().any(|c| c.y == -1 || c.y == h) {
                let row = self.clamp_row(area[0].y);
                for col in self.clamp_col(min_x)..=self.clamp_col(max_x) {
                    grid.set(Position::new(row, col), kind);
                }
            }
        } else {
            let col = if min_x == -1 { 0 } else { self.width - 1 };
            let row = if min_y == -1 { 0 } else { self.height - 1 };
            grid.set(Position::new(row, col), kind);
        }
        Ok(())
    }
}
