//! Corner counting by exact pattern matching with erasure.
//!
//! A single row-major sweep visits every window position once. When a
//! window matches a corner pattern it is counted and immediately erased
//! in the scan's own scratch copy, so the windows that slide across the
//! same physical corner afterwards see background and do not match again.
//! Sweep order therefore affects the result.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::patterns::{PatternKind, PatternLibrary};
use crate::sample::{erase_window, extract_sample, scan_positions};

/// A corner found during the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerMatch {
    /// Top row of the matched window.
    pub row: usize,
    /// Left column of the matched window.
    pub col: usize,
    /// Which base shape matched.
    pub kind: PatternKind,
}

/// Everything the corner sweep produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerScan {
    /// Matches in sweep order.
    pub matches: Vec<CornerMatch>,
    /// The scratch grid after all erasures.
    pub erased: Grid,
    /// Number of window positions visited.
    pub positions: usize,
}

impl CornerScan {
    /// Number of corners found.
    #[must_use]
    pub fn count(&self) -> usize {
        self.matches.len()
    }

    /// Number of corners derived from `kind`.
    #[must_use]
    pub fn count_kind(&self, kind: PatternKind) -> usize {
        self.matches.iter().filter(|m| m.kind == kind).count()
    }
}

/// Sweep a scratch copy of `grid`, matching and erasing corners.
///
/// A grid smaller than the sample window has no positions and yields no
/// matches.
#[must_use]
pub fn scan_corners(grid: &Grid, library: &PatternLibrary) -> CornerScan {
    let mut scratch = grid.clone();
    let mut matches = Vec::new();
    let mut positions = 0;

    for (row, col) in scan_positions(grid.width(), grid.height()) {
        positions += 1;
        // Positions come from the grid's own dimensions, so this always
        // succeeds.
        let Ok(sample) = extract_sample(&scratch, row, col) else {
            continue;
        };
        if let Some(pattern) = library.match_corner(&sample) {
            matches.push(CornerMatch {
                row,
                col,
                kind: pattern.kind,
            });
            erase_window(&mut scratch, row, col);
        }
    }

    CornerScan {
        matches,
        erased: scratch,
        positions,
    }
}

/// Count corners in `grid` against the standard catalog.
#[must_use]
pub fn count_corners(grid: &Grid) -> usize {
    scan_corners(grid, PatternLibrary::standard()).count()
}

/// Whether any window of `grid` matches a line pattern.
///
/// Read-only: no erasure takes place.
#[must_use]
pub fn has_lines(grid: &Grid, library: &PatternLibrary) -> bool {
    scan_positions(grid.width(), grid.height()).any(|(row, col)| {
        extract_sample(grid, row, col).is_ok_and(|sample| library.match_line(&sample).is_some())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::render::from_ascii;
    use crate::types::PixelState;

    fn lib() -> &'static PatternLibrary {
        PatternLibrary::standard()
    }

    #[test]
    fn rectangle_has_four_right_angles() {
        let grid = from_ascii(
            "..........\n\
             .#######..\n\
             .#.....#..\n\
             .#.....#..\n\
             .#.....#..\n\
             .#.....#..\n\
             .#######..\n\
             ..........",
        )
        .unwrap();
        let scan = scan_corners(&grid, lib());
        assert_eq!(scan.count(), 4);
        assert_eq!(scan.count_kind(PatternKind::RightAngle), 4);
        let positions: Vec<_> = scan.matches.iter().map(|m| (m.row, m.col)).collect();
        assert_eq!(positions, vec![(1, 1), (1, 5), (4, 1), (4, 5)]);
    }

    #[test]
    fn right_triangle_has_three_corners() {
        let grid = from_ascii(
            "#.......\n\
             ##......\n\
             #.#.....\n\
             #..#....\n\
             #...#...\n\
             #....#..\n\
             #######.",
        )
        .unwrap();
        let scan = scan_corners(&grid, lib());
        assert_eq!(scan.count(), 3);
        assert_eq!(scan.count_kind(PatternKind::RightAngle), 1);
        assert_eq!(scan.count_kind(PatternKind::Acute), 2);
    }

    #[test]
    fn straight_line_has_no_corners() {
        let grid = from_ascii(
            "......\n\
             ######\n\
             ......",
        )
        .unwrap();
        assert_eq!(count_corners(&grid), 0);
    }

    #[test]
    fn diagonal_line_has_no_corners() {
        let grid = from_ascii(
            "#....\n\
             .#...\n\
             ..#..\n\
             ...#.\n\
             ....#",
        )
        .unwrap();
        assert_eq!(count_corners(&grid), 0);
    }

    #[test]
    fn open_l_has_one_corner() {
        let grid = from_ascii(
            "......\n\
             .#....\n\
             .#....\n\
             .#....\n\
             .####.\n\
             ......",
        )
        .unwrap();
        assert_eq!(count_corners(&grid), 1);
    }

    #[test]
    fn erasure_blocks_the_next_overlapping_windows() {
        let grid = from_ascii(
            "###.\n\
             #...\n\
             #...\n\
             ....",
        )
        .unwrap();
        let scan = scan_corners(&grid, lib());
        assert_eq!(scan.matches.len(), 1);
        assert_eq!((scan.matches[0].row, scan.matches[0].col), (0, 0));

        for (row, col) in [(0, 1), (1, 0)] {
            let sample = extract_sample(&scan.erased, row, col).unwrap();
            assert!(lib().match_corner(&sample).is_none());
        }
    }

    #[test]
    fn overlapping_corners_count_once() {
        // Both windows match in the untouched grid; erasing the first
        // destroys the second.
        let grid = from_ascii(
            "####\n\
             #..#\n\
             #..#",
        )
        .unwrap();
        let first = extract_sample(&grid, 0, 0).unwrap();
        let second = extract_sample(&grid, 0, 1).unwrap();
        assert!(lib().match_corner(&first).is_some());
        assert!(lib().match_corner(&second).is_some());
        assert_eq!(count_corners(&grid), 1);
    }

    #[test]
    fn scan_uses_its_own_copy() {
        let grid = from_ascii("###\n#..\n#..").unwrap();
        let before = grid.clone();
        let scan = scan_corners(&grid, lib());
        assert_eq!(scan.count(), 1);
        assert_eq!(grid, before);
        assert_eq!(scan.erased.count(PixelState::Erased), 9);
    }

    #[test]
    fn repeated_scans_agree() {
        let grid = from_ascii(
            ".....\n\
             .###.\n\
             .#.#.\n\
             .###.\n\
             .....",
        )
        .unwrap();
        let first = count_corners(&grid.clone());
        let second = count_corners(&grid.clone());
        assert_eq!(first, second);
    }

    #[test]
    fn exact_size_grid_scans_once() {
        let grid = from_ascii("#..\n#..\n###").unwrap();
        let scan = scan_corners(&grid, lib());
        assert_eq!(scan.positions, 1);
        assert_eq!(scan.count(), 1);
    }

    #[test]
    fn undersized_grid_has_no_corners() {
        let grid = from_ascii("##\n#.").unwrap();
        let scan = scan_corners(&grid, lib());
        assert_eq!(scan.positions, 0);
        assert_eq!(scan.count(), 0);
    }

    #[test]
    fn line_detection() {
        let line = from_ascii("....\n####\n....").unwrap();
        assert!(has_lines(&line, lib()));

        let dot = from_ascii("...\n.#.\n...").unwrap();
        assert!(!has_lines(&dot, lib()));
    }
}
