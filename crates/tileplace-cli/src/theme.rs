use crossterm::style::Color;
use tileplace_core::Cell;

/// Colour scheme for drawing boards in the terminal
#[derive(Debug, Clone)]
pub struct Theme {
    pub empty: Color,
    pub fixed_normal: Color,
    pub fixed_frozen: Color,
    pub placed_normal: Color,
    pub placed_frozen: Color,
    pub start: Color,
    pub end: Color,
    /// Path marker drawn over cells
    pub path: Color,
    /// Legend and caption text
    pub info: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::board()
    }
}

impl Theme {
    /// Default board palette
    pub fn board() -> Self {
        Self {
            empty: Color::Rgb { r: 158, g: 227, b: 245 },
            fixed_normal: Color::Rgb { r: 244, g: 33, b: 33 },
            fixed_frozen: Color::Rgb { r: 59, g: 89, b: 239 },
            placed_normal: Color::Rgb { r: 101, g: 115, b: 126 },
            placed_frozen: Color::Rgb { r: 47, g: 48, b: 104 },
            start: Color::Rgb { r: 61, g: 246, b: 89 },
            end: Color::Rgb { r: 255, g: 173, b: 31 },
            path: Color::Black,
            info: Color::Rgb { r: 160, g: 165, b: 185 },
        }
    }

    /// Terminals without truecolor
    pub fn basic() -> Self {
        Self {
            empty: Color::Cyan,
            fixed_normal: Color::Red,
            fixed_frozen: Color::Blue,
            placed_normal: Color::DarkGrey,
            placed_frozen: Color::DarkBlue,
            start: Color::Green,
            end: Color::Yellow,
            path: Color::Black,
            info: Color::Grey,
        }
    }

    pub fn cell(&self, cell: Cell) -> Color {
        match cell {
            Cell::Empty => self.empty,
            Cell::FixedNormal => self.fixed_normal,
            Cell::FixedFrozen => self.fixed_frozen,
            Cell::PlacedNormal => self.placed_normal,
            Cell::PlacedFrozen => self.placed_frozen,
            Cell::Start => self.start,
            Cell::End => self.end,
        }
    }
}

/// Legend label for a cell kind
pub fn label(cell: Cell) -> &'static str {
    match cell {
        Cell::Empty => "Empty",
        Cell::FixedNormal => "Normal fixed",
        Cell::FixedFrozen => "Frost fixed",
        Cell::PlacedNormal => "Normal movable",
        Cell::PlacedFrozen => "Frost movable",
        Cell::Start => "Start",
        Cell::End => "End",
    }
}
