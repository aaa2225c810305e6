//! Plain-text rendering of grids, one glyph per cell.
//!
//! | glyph | state |
//! |-------|-------|
//! | `.`   | background |
//! | `#`   | foreground |
//! | `~`   | flood marker |
//! | `x`   | erased |
//! | `?`   | unknown |
//!
//! [`from_ascii`] parses the same format, which makes hand-drawn test
//! fixtures and `.txt` inputs possible.

use crate::grid::Grid;
use crate::types::{PipelineError, PixelState};

/// Glyph for a single state.
#[must_use]
pub const fn glyph(state: PixelState) -> char {
    match state {
        PixelState::Background => '.',
        PixelState::Foreground => '#',
        PixelState::FloodMarker => '~',
        PixelState::Erased => 'x',
        PixelState::Unknown => '?',
    }
}

/// State for a glyph, if it is one of the known glyphs.
#[must_use]
pub const fn state_of(glyph: char) -> Option<PixelState> {
    match glyph {
        '.' => Some(PixelState::Background),
        '#' => Some(PixelState::Foreground),
        '~' => Some(PixelState::FloodMarker),
        'x' => Some(PixelState::Erased),
        '?' => Some(PixelState::Unknown),
        _ => None,
    }
}

/// Render the grid as newline-separated rows.
#[must_use]
pub fn to_ascii(grid: &Grid) -> String {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for row in grid.rows() {
        out.extend(row.iter().map(|&s| glyph(s)));
        out.push('\n');
    }
    out
}

/// Parse rows of glyphs into a grid.
///
/// Surrounding whitespace on each line is ignored, as are blank lines.
///
/// # Errors
///
/// Returns [`PipelineError::AsciiParse`] for an unknown glyph or rows of
/// differing length.
pub fn from_ascii(text: &str) -> Result<Grid, PipelineError> {
    let mut width = None;
    let mut cells = Vec::new();
    let mut height = 0;

    for (line_no, line) in text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
    {
        let before = cells.len();
        for ch in line.chars() {
            let state = state_of(ch).ok_or_else(|| {
                PipelineError::AsciiParse(format!("unknown glyph {ch:?} on row {line_no}"))
            })?;
            cells.push(state);
        }
        let row_width = cells.len() - before;
        match width {
            None => width = Some(row_width),
            Some(w) if w != row_width => {
                return Err(PipelineError::AsciiParse(format!(
                    "row {line_no} has {row_width} cells, expected {w}"
                )));
            }
            Some(_) => {}
        }
        height += 1;
    }

    Grid::from_cells(width.unwrap_or(0), height, cells)
}
