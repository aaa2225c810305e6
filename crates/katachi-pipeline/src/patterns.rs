//! Reference catalog of corner and line samples.
//!
//! The catalog is built once, on first use, from a handful of named base
//! shapes expanded under rotation and reflection. It is immutable
//! afterwards. Membership is exact-match only.
//!
//! Corner shapes (vertex in a window corner, arms of length 3):
//!
//! ```text
//! RIGHT_ANGLE   ACUTE
//!   ###          #..
//!   #..          ##.
//!   #..          #.#
//! ```
//!
//! Line shapes cover straight runs along an edge of the window, through
//! its middle, and along a diagonal. The two sets are disjoint.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::sample::Sample;

/// Right angle between a horizontal and a vertical arm.
pub const RIGHT_ANGLE: Sample = Sample::from_art([b"###", b"#..", b"#.."]);

/// 45 degree angle between an axis-aligned arm and a diagonal arm.
pub const ACUTE: Sample = Sample::from_art([b"#..", b"##.", b"#.#"]);

/// Straight run along the window edge.
pub const EDGE_LINE: Sample = Sample::from_art([b"###", b"...", b"..."]);

/// Straight run through the window center.
pub const CENTER_LINE: Sample = Sample::from_art([b"...", b"###", b"..."]);

/// Diagonal run through the window.
pub const DIAGONAL_LINE: Sample = Sample::from_art([b"#..", b".#.", b"..#"]);

/// Which base shape a catalog entry was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    /// Derived from [`RIGHT_ANGLE`].
    RightAngle,
    /// Derived from [`ACUTE`].
    Acute,
    /// Derived from [`EDGE_LINE`].
    EdgeLine,
    /// Derived from [`CENTER_LINE`].
    CenterLine,
    /// Derived from [`DIAGONAL_LINE`].
    DiagonalLine,
}

impl PatternKind {
    /// Whether this kind belongs to the corner set.
    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(self, Self::RightAngle | Self::Acute)
    }
}

/// One catalog entry: a reference sample tagged with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    /// Base shape this entry is an image of.
    pub kind: PatternKind,
    /// The reference sample.
    pub sample: Sample,
}

/// The two disjoint sets of reference samples.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    corners: Vec<Pattern>,
    lines: Vec<Pattern>,
}

static STANDARD: LazyLock<PatternLibrary> = LazyLock::new(PatternLibrary::build_standard);

impl PatternLibrary {
    /// The process-wide standard catalog.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    fn build_standard() -> Self {
        let (corners, lines) = expand(&[
            (PatternKind::RightAngle, RIGHT_ANGLE),
            (PatternKind::Acute, ACUTE),
            (PatternKind::EdgeLine, EDGE_LINE),
            (PatternKind::CenterLine, CENTER_LINE),
            (PatternKind::DiagonalLine, DIAGONAL_LINE),
        ])
        .into_iter()
        .partition(|p| p.kind.is_corner());
        Self { corners, lines }
    }

    /// Corner patterns.
    #[must_use]
    pub fn corners(&self) -> &[Pattern] {
        &self.corners
    }

    /// Line patterns.
    #[must_use]
    pub fn lines(&self) -> &[Pattern] {
        &self.lines
    }

    /// The corner pattern `sample` equals, if any.
    #[must_use]
    pub fn match_corner(&self, sample: &Sample) -> Option<&Pattern> {
        self.corners.iter().find(|p| p.sample == *sample)
    }

    /// The line pattern `sample` equals, if any.
    #[must_use]
    pub fn match_line(&self, sample: &Sample) -> Option<&Pattern> {
        self.lines.iter().find(|p| p.sample == *sample)
    }
}

fn expand(bases: &[(PatternKind, Sample)]) -> Vec<Pattern> {
    bases
        .iter()
        .flat_map(|&(kind, base)| {
            base.symmetries()
                .into_iter()
                .map(move |sample| Pattern { kind, sample })
        })
        .collect()
}
