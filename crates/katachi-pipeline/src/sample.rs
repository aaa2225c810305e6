//! Fixed-size square windows of classified pixels.
//!
//! A [`Sample`] is the unit of local pattern matching: an
//! [`SAMPLE_SIZE`] x [`SAMPLE_SIZE`] block of [`PixelState`]s read from a
//! [`Grid`] at a top-left offset. Two samples are equal iff every cell
//! matches; there is no rotation or reflection normalization.

use std::fmt;

use crate::grid::Grid;
use crate::types::{PipelineError, PixelState};

/// Side length of a sample window.
pub const SAMPLE_SIZE: usize = 3;
const _: () = assert!(SAMPLE_SIZE > 0);

/// An N x N window of pixel states, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sample([[PixelState; SAMPLE_SIZE]; SAMPLE_SIZE]);

impl Sample {
    /// Build a sample from ASCII art rows: `#` is foreground, anything
    /// else background.
    ///
    /// Used to write the pattern catalog as named constants.
    #[must_use]
    pub const fn from_art(rows: [&[u8; SAMPLE_SIZE]; SAMPLE_SIZE]) -> Self {
        let mut cells = [[PixelState::Background; SAMPLE_SIZE]; SAMPLE_SIZE];
        let mut i = 0;
        while i < SAMPLE_SIZE {
            let mut j = 0;
            while j < SAMPLE_SIZE {
                if rows[i][j] == b'#' {
                    cells[i][j] = PixelState::Foreground;
                }
                j += 1;
            }
            i += 1;
        }
        Self(cells)
    }

    /// The state at (`row`, `col`) within the window.
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> Option<PixelState> {
        if row < SAMPLE_SIZE && col < SAMPLE_SIZE {
            Some(self.0[row][col])
        } else {
            None
        }
    }

    /// The rows of the window.
    #[must_use]
    pub const fn rows(&self) -> &[[PixelState; SAMPLE_SIZE]; SAMPLE_SIZE] {
        &self.0
    }

    /// Rotate 90 degrees clockwise.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let mut out = self.0;
        for (i, row) in self.0.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                out[j][SAMPLE_SIZE - 1 - i] = cell;
            }
        }
        Self(out)
    }

    /// Mirror across the main diagonal.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut out = self.0;
        for (i, row) in self.0.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                out[j][i] = cell;
            }
        }
        Self(out)
    }

    /// All distinct images of this sample under rotation and reflection,
    /// starting with the sample itself.
    #[must_use]
    pub fn symmetries(&self) -> Vec<Self> {
        let mut out: Vec<Self> = Vec::with_capacity(8);
        for start in [*self, self.transposed()] {
            let mut current = start;
            for _ in 0..4 {
                if !out.contains(&current) {
                    out.push(current);
                }
                current = current.rotated();
            }
        }
        out
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            for &cell in row {
                f.write_str(if cell == PixelState::Foreground { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

/// Read the window whose top-left cell is (`row`, `col`).
///
/// Erased cells read as background. Callers are expected to stay inside
/// [`scan_positions`]; this function does not clamp.
///
/// # Errors
///
/// Returns [`PipelineError::OutOfBounds`] if `row + SAMPLE_SIZE > height`
/// or `col + SAMPLE_SIZE > width`.
pub fn extract_sample(grid: &Grid, row: usize, col: usize) -> Result<Sample, PipelineError> {
    let out_of_bounds = || PipelineError::OutOfBounds {
        row,
        col,
        width: grid.width(),
        height: grid.height(),
    };
    let fits = |start: usize, limit: usize| {
        start
            .checked_add(SAMPLE_SIZE)
            .is_some_and(|end| end <= limit)
    };
    if !fits(row, grid.height()) || !fits(col, grid.width()) {
        return Err(out_of_bounds());
    }

    let mut cells = [[PixelState::Background; SAMPLE_SIZE]; SAMPLE_SIZE];
    for (i, out_row) in cells.iter_mut().enumerate() {
        for (j, cell) in out_row.iter_mut().enumerate() {
            let state = grid.get(row + i, col + j).ok_or_else(out_of_bounds)?;
            *cell = match state {
                PixelState::Erased => PixelState::Background,
                other => other,
            };
        }
    }
    Ok(Sample(cells))
}

/// Overwrite the window at (`row`, `col`) with [`PixelState::Erased`].
///
/// Cells outside the grid are skipped.
pub fn erase_window(grid: &mut Grid, row: usize, col: usize) {
    for i in 0..SAMPLE_SIZE {
        let Some(r) = row.checked_add(i) else {
            break;
        };
        for j in 0..SAMPLE_SIZE {
            let Some(c) = col.checked_add(j) else {
                break;
            };
            if let Some(cell) = grid.get_mut(r, c) {
                *cell = PixelState::Erased;
            }
        }
    }
}

/// Every valid top-left window position, row-major.
///
/// Rows run `0..=height - SAMPLE_SIZE` and columns `0..=width -
/// SAMPLE_SIZE`. A grid smaller than the window in either axis yields
/// nothing.
pub fn scan_positions(width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    let rows = height.saturating_add(1).saturating_sub(SAMPLE_SIZE);
    let cols = width.saturating_add(1).saturating_sub(SAMPLE_SIZE);
    (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
}
