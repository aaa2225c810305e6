//! Decision table from analysis findings to a figure label.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::AnalysisResult;

/// The kind of figure found in an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// No foreground at all.
    Blank,
    /// Closed, no corners.
    Ellipse,
    /// Closed, three corners.
    Triangle,
    /// Closed, four corners.
    Rectangle,
    /// Closed with any other corner count.
    UnknownClosed,
    /// Open, no corners.
    LineOrCurve,
    /// Open with at least one corner.
    PolylineOrPolycurve,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blank => "BLANK",
            Self::Ellipse => "ELLIPSE",
            Self::Triangle => "TRIANGLE",
            Self::Rectangle => "RECTANGLE",
            Self::UnknownClosed => "UNKNOWN",
            Self::LineOrCurve => "LINE or CURVE",
            Self::PolylineOrPolycurve => "POLYLINE or POLYCURVE",
        })
    }
}

/// Map `(is_blank, is_closed, corner_count)` to a label.
///
/// Blank wins over everything else; closure and corners are ignored for
/// a blank image.
#[must_use]
pub const fn classify(is_blank: bool, is_closed: bool, corner_count: usize) -> Label {
    match (is_blank, is_closed, corner_count) {
        (true, _, _) => Label::Blank,
        (false, true, 0) => Label::Ellipse,
        (false, true, 3) => Label::Triangle,
        (false, true, 4) => Label::Rectangle,
        (false, true, _) => Label::UnknownClosed,
        (false, false, 0) => Label::LineOrCurve,
        (false, false, _) => Label::PolylineOrPolycurve,
    }
}

/// [`classify`] applied to an [`AnalysisResult`].
#[must_use]
pub const fn classify_result(result: &AnalysisResult) -> Label {
    classify(result.is_blank, result.is_closed, result.corner_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_overrides_everything() {
        assert_eq!(classify(true, false, 0), Label::Blank);
        assert_eq!(classify(true, true, 4), Label::Blank);
        assert_eq!(classify(true, false, 7), Label::Blank);
    }

    #[test]
    fn closed_figures() {
        assert_eq!(classify(false, true, 0), Label::Ellipse);
        assert_eq!(classify(false, true, 3), Label::Triangle);
        assert_eq!(classify(false, true, 4), Label::Rectangle);
    }

    #[test]
    fn closed_with_other_corner_counts_is_unknown() {
        for n in [1, 2, 5, 6, 100] {
            assert_eq!(classify(false, true, n), Label::UnknownClosed, "n={n}");
        }
    }

    #[test]
    fn open_figures() {
        assert_eq!(classify(false, false, 0), Label::LineOrCurve);
        for n in [1, 3, 4, 9] {
            assert_eq!(classify(false, false, n), Label::PolylineOrPolycurve);
        }
    }

    #[test]
    fn classify_result_reads_fields() {
        let result = AnalysisResult {
            is_blank: false,
            is_closed: true,
            corner_count: 3,
        };
        assert_eq!(classify_result(&result), Label::Triangle);
    }

    #[test]
    fn display_text() {
        assert_eq!(Label::Blank.to_string(), "BLANK");
        assert_eq!(Label::UnknownClosed.to_string(), "UNKNOWN");
        assert_eq!(Label::LineOrCurve.to_string(), "LINE or CURVE");
        assert_eq!(
            Label::PolylineOrPolycurve.to_string(),
            "POLYLINE or POLYCURVE"
        );
    }
}
