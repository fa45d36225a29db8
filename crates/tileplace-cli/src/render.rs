use crate::theme::{label, Theme};
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::collections::HashSet;
use std::io::{self, Write};
use tileplace_core::{Cell, Grid, Position};

const LEGEND: [Cell; 7] = [
    Cell::Empty,
    Cell::FixedNormal,
    Cell::FixedFrozen,
    Cell::PlacedNormal,
    Cell::PlacedFrozen,
    Cell::Start,
    Cell::End,
];

/// Draw the board, two columns per cell, with `path` points marked
pub fn render_grid<W: Write>(
    out: &mut W,
    grid: &Grid,
    path: &[Position],
    theme: &Theme,
    title: &str,
) -> io::Result<()> {
    let on_path: HashSet<Position> = path.iter().copied().collect();

    queue!(
        out,
        SetForegroundColor(theme.info),
        Print(title),
        ResetColor,
        Print("\n")
    )?;
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let pos = Position::new(row, col);
            let glyph = if on_path.contains(&pos) { "()" } else { "  " };
            queue!(
                out,
                SetBackgroundColor(theme.cell(grid.get(pos))),
                SetForegroundColor(theme.path),
                Print(glyph)
            )?;
        }
        queue!(out, ResetColor, Print("\n"))?;
    }

    for cell in LEGEND {
        queue!(
            out,
            SetBackgroundColor(theme.cell(cell)),
            Print("  "),
            ResetColor,
            SetForegroundColor(theme.info),
            Print(format!(" {:>2} {}  ", cell.code(), label(cell))),
            ResetColor
        )?;
    }
    queue!(out, Print("\n"), SetForegroundColor(Color::Reset))?;
    out.flush()
}

/// Plain-text board with path points drawn as `*`
pub fn plain_grid(grid: &Grid, path: &[Position]) -> String {
    let on_path: HashSet<Position> = path.iter().copied().collect();
    let text = grid.to_string();
    text.lines()
        .enumerate()
        .map(|(row, line)| {
            line.chars()
                .enumerate()
                .map(|(col, c)| {
                    if on_path.contains(&Position::new(row, col)) && c == '.' {
                        '*'
                    } else {
                        c
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
