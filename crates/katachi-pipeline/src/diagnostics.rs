//! Pipeline diagnostics: timing and counts for each analysis stage.
//!
//! Every call to [`analyze_with_diagnostics`] or
//! [`process_with_diagnostics`] collects diagnostics alongside the
//! analysis results. The pipeline itself never prints; callers decide
//! whether to show [`AnalysisDiagnostics::report`] or serialize the
//! record.
//!
//! Timestamps come from a caller-supplied [`Clock`] so this crate stays
//! free of platform time sources.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classify::{Label, classify_result};
use crate::corners::scan_corners;
use crate::flood::{enclosed_cells, flood_from_border};
use crate::grid::Grid;
use crate::patterns::{PatternKind, PatternLibrary};
use crate::types::{AnalysisConfig, AnalysisResult, PipelineError, PixelState};
use crate::{StagedAnalysis, decode, has_lines};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of timestamps for stage timing.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single pipeline run.
///
/// Stages that did not run are `None`: `decode` when analysis started
/// from a grid, `closure` and `corners` when the grid was blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDiagnostics {
    /// Image decoding and pixel classification.
    pub decode: Option<StageDiagnostics>,
    /// Foreground scan.
    pub blank_check: StageDiagnostics,
    /// Border flood.
    pub closure: Option<StageDiagnostics>,
    /// Corner sweep and line search.
    pub corners: Option<StageDiagnostics>,
    /// Decision table.
    pub classify: StageDiagnostics,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary across all stages.
    pub summary: AnalysisSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Image decoding metrics.
    Decode {
        /// Size of the input image bytes.
        input_bytes: usize,
        /// Decoded width in pixels.
        width: usize,
        /// Decoded height in pixels.
        height: usize,
    },
    /// Blank check metrics.
    BlankCheck {
        /// Cells classified as foreground.
        foreground_cells: usize,
        /// Cells matching no reference color.
        unknown_cells: usize,
    },
    /// Closure metrics.
    Closure {
        /// Cells reached by the border flood.
        flooded_cells: usize,
        /// Background cells the flood could not reach.
        enclosed_cells: usize,
    },
    /// Corner sweep metrics.
    Corners {
        /// Window positions visited.
        positions: usize,
        /// Right-angle matches.
        right_angle: usize,
        /// Acute matches.
        acute: usize,
        /// Whether any line pattern occurs.
        has_lines: bool,
    },
    /// Decision table metrics.
    Classify {
        /// Resulting label.
        label: Label,
    },
}

/// High-level summary of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Final label.
    pub label: Label,
    /// Corner count the label was derived from.
    pub corner_count: usize,
    /// Whether the figure was found closed.
    pub is_closed: bool,
}

impl AnalysisDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Analysis Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Grid: {}x{} ({} cells)",
            self.summary.width,
            self.summary.height,
            self.summary.width * self.summary.height,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        let mut stages: Vec<(&str, &StageDiagnostics)> = Vec::new();
        if let Some(ref d) = self.decode {
            stages.push(("Decode", d));
        }
        stages.push(("Blank Check", &self.blank_check));
        if let Some(ref c) = self.closure {
            stages.push(("Closure", c));
        }
        if let Some(ref c) = self.corners {
            stages.push(("Corners", c));
        }
        stages.push(("Classify", &self.classify));

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Label: {}  |  Corners: {}  |  Closed: {}",
            self.summary.label, self.summary.corner_count, self.summary.is_closed,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Decode {
            input_bytes,
            width,
            height,
        } => format!("{input_bytes} bytes -> {width}x{height}"),
        StageMetrics::BlankCheck {
            foreground_cells,
            unknown_cells,
        } => format!("foreground={foreground_cells} unknown={unknown_cells}"),
        StageMetrics::Closure {
            flooded_cells,
            enclosed_cells,
        } => format!("flooded={flooded_cells} enclosed={enclosed_cells}"),
        StageMetrics::Corners {
            positions,
            right_angle,
            acute,
            has_lines,
        } => format!(
            "{positions} windows, right={right_angle} acute={acute} lines={has_lines}"
        ),
        StageMetrics::Classify { label } => label.to_string(),
    }
}

/// Analyze `grid`, timing each stage with `clock`.
///
/// Produces the same [`StagedAnalysis`] as
/// [`analyze_staged`](crate::analyze_staged).
pub fn analyze_with_diagnostics<C: Clock>(
    grid: &Grid,
    clock: &C,
) -> (StagedAnalysis, AnalysisDiagnostics) {
    let total_start = clock.now();
    let (staged, stages) = run_stages(grid, clock);
    let diagnostics = finish(&staged, None, stages, clock.elapsed(&total_start));
    (staged, diagnostics)
}

/// Decode `image_bytes` and analyze the result, timing each stage.
///
/// The decoded grid is returned alongside the analysis so callers can
/// display it without decoding again.
///
/// # Errors
///
/// See [`decode`](crate::decode).
pub fn process_with_diagnostics<C: Clock>(
    image_bytes: &[u8],
    config: &AnalysisConfig,
    clock: &C,
) -> Result<(Grid, StagedAnalysis, AnalysisDiagnostics), PipelineError> {
    let total_start = clock.now();

    let start = clock.now();
    let grid = decode(image_bytes, config)?;
    let decode_stage = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Decode {
            input_bytes: image_bytes.len(),
            width: grid.width(),
            height: grid.height(),
        },
    };

    let (staged, stages) = run_stages(&grid, clock);
    let diagnostics = finish(
        &staged,
        Some(decode_stage),
        stages,
        clock.elapsed(&total_start),
    );
    Ok((grid, staged, diagnostics))
}

struct TimedStages {
    blank_check: StageDiagnostics,
    closure: Option<StageDiagnostics>,
    corners: Option<StageDiagnostics>,
    classify: StageDiagnostics,
}

fn run_stages<C: Clock>(grid: &Grid, clock: &C) -> (StagedAnalysis, TimedStages) {
    let dimensions = grid.dimensions();

    let start = clock.now();
    let is_blank = grid.is_blank();
    let blank_check = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::BlankCheck {
            foreground_cells: grid.count(PixelState::Foreground),
            unknown_cells: grid.count(PixelState::Unknown),
        },
    };

    let mut closure = None;
    let mut corners_stage = None;
    let mut flooded = None;
    let mut corner_scan = None;
    let mut lines_found = false;
    let mut result = AnalysisResult {
        is_blank,
        ..AnalysisResult::default()
    };

    if !is_blank {
        let start = clock.now();
        let grid_flooded = flood_from_border(grid);
        let enclosed = enclosed_cells(&grid_flooded);
        result.is_closed = enclosed > 0;
        closure = Some(StageDiagnostics {
            duration: clock.elapsed(&start),
            metrics: StageMetrics::Closure {
                flooded_cells: grid_flooded.count(PixelState::FloodMarker),
                enclosed_cells: enclosed,
            },
        });
        flooded = Some(grid_flooded);

        let start = clock.now();
        let library = PatternLibrary::standard();
        let scan = scan_corners(grid, library);
        lines_found = has_lines(grid, library);
        result.corner_count = scan.count();
        corners_stage = Some(StageDiagnostics {
            duration: clock.elapsed(&start),
            metrics: StageMetrics::Corners {
                positions: scan.positions,
                right_angle: scan.count_kind(PatternKind::RightAngle),
                acute: scan.count_kind(PatternKind::Acute),
                has_lines: lines_found,
            },
        });
        corner_scan = Some(scan);
    }

    let start = clock.now();
    let label = classify_result(&result);
    let classify = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Classify { label },
    };

    let staged = StagedAnalysis {
        result,
        label,
        dimensions,
        flooded,
        corners: corner_scan,
        has_lines: lines_found,
    };
    let stages = TimedStages {
        blank_check,
        closure,
        corners: corners_stage,
        classify,
    };
    (staged, stages)
}

fn finish(
    staged: &StagedAnalysis,
    decode: Option<StageDiagnostics>,
    stages: TimedStages,
    total_duration: Duration,
) -> AnalysisDiagnostics {
    AnalysisDiagnostics {
        decode,
        blank_check: stages.blank_check,
        closure: stages.closure,
        corners: stages.corners,
        classify: stages.classify,
        total_duration,
        summary: AnalysisSummary {
            width: staged.dimensions.width,
            height: staged.dimensions.height,
            label: staged.label,
            corner_count: staged.result.corner_count,
            is_closed: staged.result.is_closed,
        },
    }
}
