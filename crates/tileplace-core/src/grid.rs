//! Board model: typed cells, positions, and 2x2 tile geometry.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Kind of a single board cell, serialized as its integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Cell {
    /// Traversable, free for placement
    Empty,
    /// Pre-existing normal tower
    FixedNormal,
    /// Pre-existing frozen tower
    FixedFrozen,
    /// Normal tile placed by the optimizer
    PlacedNormal,
    /// Frozen tile placed by the optimizer
    PlacedFrozen,
    Start,
    End,
}

impl Cell {
    pub fn code(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::FixedNormal => 1,
            Cell::FixedFrozen => 2,
            Cell::PlacedNormal => 3,
            Cell::PlacedFrozen => 4,
            Cell::Start => -1,
            Cell::End => -2,
        }
    }

    pub fn from_code(code: i64) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::FixedNormal),
            2 => Some(Cell::FixedFrozen),
            3 => Some(Cell::PlacedNormal),
            4 => Some(Cell::PlacedFrozen),
            -1 => Some(Cell::Start),
            -2 => Some(Cell::End),
            _ => None,
        }
    }

    /// Impassable for path search
    pub fn is_obstacle(self) -> bool {
        matches!(
            self,
            Cell::FixedNormal | Cell::FixedFrozen | Cell::PlacedNormal | Cell::PlacedFrozen
        )
    }

    pub fn is_frozen(self) -> bool {
        matches!(self, Cell::FixedFrozen | Cell::PlacedFrozen)
    }

    /// Tiles introduced by the optimizer rather than the board itself
    pub fn is_placed(self) -> bool {
        matches!(self, Cell::PlacedNormal | Cell::PlacedFrozen)
    }

    fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::FixedNormal => 'N',
            Cell::FixedFrozen => 'F',
            Cell::PlacedNormal => 'n',
            Cell::PlacedFrozen => 'f',
            Cell::Start => 'S',
            Cell::End => 'E',
        }
    }

    fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'N' => Some(Cell::FixedNormal),
            'F' => Some(Cell::FixedFrozen),
            'n' => Some(Cell::PlacedNormal),
            'f' => Some(Cell::PlacedFrozen),
            'S' => Some(Cell::Start),
            'E' => Some(Cell::End),
            _ => None,
        }
    }
}

impl From<Cell> for i8 {
    fn from(cell: Cell) -> i8 {
        cell.code()
    }
}

impl TryFrom<i8> for Cell {
    type Error = Error;

    fn try_from(code: i8) -> Result<Cell> {
        Cell::from_code(code as i64).ok_or(Error::InvalidCellCode(code as i64))
    }
}

/// A cell coordinate. For tiles, the top-left corner of the 2x2 footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Centre of the 2x2 tile whose top-left corner is this position
    pub fn tile_center(self) -> (f64, f64) {
        (self.row as f64 + 0.5, self.col as f64 + 0.5)
    }

    /// The four cells covered by a tile anchored here
    pub fn footprint(self) -> [Position; 4] {
        [
            Position::new(self.row, self.col),
            Position::new(self.row, self.col + 1),
            Position::new(self.row + 1, self.col),
            Position::new(self.row + 1, self.col + 1),
        ]
    }

    pub fn as_point(self) -> (f64, f64) {
        (self.row as f64, self.col as f64)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl From<Position> for (usize, usize) {
    fn from(pos: Position) -> Self {
        (pos.row, pos.col)
    }
}

/// Euclidean distance between two points
#[inline]
pub fn l2norm(p: (f64, f64), q: (f64, f64)) -> f64 {
    ((p.0 - q.0).powi(2) + (p.1 - q.1).powi(2)).sqrt()
}

/// True iff any two 2x2 footprints anchored at `positions` share a cell
pub fn overlaps(positions: &[Position]) -> bool {
    let mut occupied = HashSet::with_capacity(positions.len() * 4);
    for pos in positions {
        for cell in pos.footprint() {
            if !occupied.insert(cell) {
                return true;
            }
        }
    }
    false
}

/// Rectangular board of typed cells, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i8>>", into = "Vec<Vec<i8>>")]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-empty grid
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![Cell::Empty; height * width],
        }
    }

    /// Build a grid from rows of integer cell codes
    pub fn from_rows<T: Copy + Into<i64>>(rows: &[Vec<T>]) -> Result<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(Error::EmptyGrid);
        }
        let mut cells = Vec::with_capacity(rows.len() * width);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(Error::RaggedGrid {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            for &v in values {
                let code: i64 = v.into();
                cells.push(Cell::from_code(code).ok_or(Error::InvalidCellCode(code))?);
            }
        }
        Ok(Self {
            height: rows.len(),
            width,
            cells,
        })
    }

    /// Parse the text form: one line per row, characters `.NFnfSE`.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_string(s: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = line
                .chars()
                .map(|c| Cell::from_char(c).map(Cell::code).ok_or(Error::UnknownCellChar(c)))
                .collect::<Result<Vec<i8>>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }

    pub fn to_rows(&self) -> Vec<Vec<i8>> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row * self.width + pos.col
    }

    #[inline]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        let idx = self.index(pos);
        self.cells[idx] = cell;
    }

    /// Iterate `(position, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (Position::new(i / width, i % width), c))
    }

    pub fn positions_of(&self, kind: Cell) -> Vec<Position> {
        self.iter()
            .filter(|&(_, c)| c == kind)
            .map(|(p, _)| p)
            .collect()
    }

    /// Whether a 2x2 tile fits at `(row, col)` over four empty cells
    pub fn can_place(&self, row: usize, col: usize) -> bool {
        if row + 1 >= self.height || col + 1 >= self.width {
            return false;
        }
        Position::new(row, col)
            .footprint()
            .iter()
            .all(|&p| self.get(p) == Cell::Empty)
    }

    /// Copy of this grid with a tile of `kind` at `(row, col)`.
    /// The caller must have checked `can_place`.
    pub fn place(&self, row: usize, col: usize, kind: Cell) -> Grid {
        let mut grid = self.clone();
        grid.paint_tile(Position::new(row, col), kind);
        grid
    }

    /// Paint a 2x2 tile in place
    pub fn paint_tile(&mut self, top_left: Position, kind: Cell) {
        for p in top_left.footprint() {
            self.set(p, kind);
        }
    }

    /// Reset a 2x2 footprint to empty
    pub fn clear_tile(&mut self, top_left: Position) {
        self.paint_tile(top_left, Cell::Empty);
    }

    /// All top-left corners where a tile can be placed, row-major
    pub fn valid_top_left_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for row in 0..self.height.saturating_sub(1) {
            for col in 0..self.width.saturating_sub(1) {
                if self.can_place(row, col) {
                    positions.push(Position::new(row, col));
                }
            }
        }
        positions
    }

    /// Centres of every 2x2 window made entirely of frozen cells
    pub fn frozen_tile_centers(&self) -> Vec<(f64, f64)> {
        let mut centers = Vec::new();
        for row in 0..self.height.saturating_sub(1) {
            for col in 0..self.width.saturating_sub(1) {
                let pos = Position::new(row, col);
                if pos.footprint().iter().all(|&p| self.get(p).is_frozen()) {
                    centers.push(pos.tile_center());
                }
            }
        }
        centers
    }

    /// Base grids may only hold empty, fixed, start and end cells
    pub fn validate_base(&self) -> Result<()> {
        match self.iter().find(|&(_, c)| c.is_placed()) {
            Some((pos, _)) => Err(Error::PlacedTileInBase {
                row: pos.row,
                col: pos.col,
            }),
            None => Ok(()),
        }
    }
}

impl TryFrom<Vec<Vec<i8>>> for Grid {
    type Error = Error;

    fn try_from(rows: Vec<Vec<i8>>) -> Result<Grid> {
        Grid::from_rows(&rows)
    }
}

impl From<Grid> for Vec<Vec<i8>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|c| c.to_char()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
