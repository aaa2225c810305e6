//! Closure detection by flooding from the image border.
//!
//! Every border cell seeds a 4-connected flood through non-blocking
//! cells. Whatever background is left afterwards is enclosed by
//! foreground, so the figure is closed.
//!
//! The flood uses an explicit stack: region size is bounded only by the
//! image area, which easily exceeds the default thread stack when
//! recursing per cell.

use crate::grid::Grid;
use crate::types::PixelState;

/// Flood the 4-connected region containing (`row`, `col`) with
/// [`PixelState::FloodMarker`].
///
/// Expansion stops at foreground and at already-flooded cells.
/// Out-of-bounds seeds and neighbors are ignored. Returns the number of
/// cells newly marked.
pub fn flood_fill(grid: &mut Grid, row: usize, col: usize) -> usize {
    if !mark(grid, row, col) {
        return 0;
    }
    let mut filled = 1;
    let mut stack = vec![(row, col)];

    while let Some((r, c)) = stack.pop() {
        let neighbors = [
            (r.checked_sub(1), Some(c)),
            (Some(r + 1), Some(c)),
            (Some(r), c.checked_sub(1)),
            (Some(r), Some(c + 1)),
        ];
        for (nr, nc) in neighbors {
            let (Some(nr), Some(nc)) = (nr, nc) else {
                continue;
            };
            if mark(grid, nr, nc) {
                filled += 1;
                stack.push((nr, nc));
            }
        }
    }

    filled
}

/// Mark one cell as flooded if it is inside the grid and not blocking.
fn mark(grid: &mut Grid, row: usize, col: usize) -> bool {
    match grid.get_mut(row, col) {
        Some(cell) if !cell.blocks_flood() => {
            *cell = PixelState::FloodMarker;
            true
        }
        _ => false,
    }
}

/// Flood a scratch copy of `grid` from every border cell.
///
/// The input is left untouched; the flooded copy is returned.
#[must_use]
pub fn flood_from_border(grid: &Grid) -> Grid {
    let mut scratch = grid.clone();
    let (width, height) = (grid.width(), grid.height());
    if width == 0 || height == 0 {
        return scratch;
    }

    for col in 0..width {
        flood_fill(&mut scratch, 0, col);
        flood_fill(&mut scratch, height - 1, col);
    }
    for row in 0..height {
        flood_fill(&mut scratch, row, 0);
        flood_fill(&mut scratch, row, width - 1);
    }
    scratch
}

/// Whether some background cell cannot be reached from the border
/// without crossing foreground.
///
/// Meaningless on a blank grid (every cell would be reachable or the
/// grid empty); check [`Grid::is_blank`] first.
#[must_use]
pub fn is_closed(grid: &Grid) -> bool {
    enclosed_cells(&flood_from_border(grid)) > 0
}

/// Count background cells left in an already flooded grid.
#[must_use]
pub fn enclosed_cells(flooded: &Grid) -> usize {
    flooded.count(PixelState::Background)
}
