//! katachi-pipeline: Pure figure classification pipeline (sans-IO).
//!
//! Classifies the single figure drawn in a black-and-white raster image:
//! blank check -> closure check (border flood) -> corner count (pattern
//! matching with erasure) -> decision table.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and grids and returns structured data. File handling and
//! printing live in `katachi-cli`.

pub mod classify;
pub mod corners;
pub mod diagnostics;
pub mod flood;
pub mod grid;
pub mod patterns;
pub mod render;
pub mod sample;
pub mod types;

pub use classify::{Label, classify};
pub use corners::{CornerMatch, CornerScan, count_corners, has_lines, scan_corners};
pub use flood::{flood_fill, flood_from_border, is_closed};
pub use grid::Grid;
pub use patterns::{PatternKind, PatternLibrary};
pub use sample::{SAMPLE_SIZE, Sample, extract_sample};
pub use types::{
    AnalysisConfig, AnalysisResult, Classification, Dimensions, Palette, PipelineError, PixelState,
};

/// Analysis result together with the intermediate grids it came from.
///
/// `flooded` and `corners` are `None` when the grid is blank, since the
/// pipeline short-circuits before running those passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAnalysis {
    /// Raw findings.
    pub result: AnalysisResult,
    /// Label derived from `result`.
    pub label: Label,
    /// Dimensions of the analyzed grid.
    pub dimensions: Dimensions,
    /// Border-flooded scratch grid.
    pub flooded: Option<Grid>,
    /// Corner sweep, including its erasure scratch grid.
    pub corners: Option<CornerScan>,
    /// Whether any line pattern occurs in the input.
    pub has_lines: bool,
}

impl StagedAnalysis {
    /// The outward-facing result.
    #[must_use]
    pub const fn classification(&self) -> Classification {
        Classification {
            label: self.label,
            corner_count: self.result.corner_count,
            dimensions: self.dimensions,
        }
    }
}

/// Run blank check, closure check and corner count on `grid`.
///
/// A blank grid short-circuits: closure and corners are not computed.
#[must_use]
pub fn analyze(grid: &Grid) -> AnalysisResult {
    analyze_staged(grid).result
}

/// Like [`analyze`] but keeps every intermediate for display.
#[must_use]
pub fn analyze_staged(grid: &Grid) -> StagedAnalysis {
    let dimensions = grid.dimensions();
    if grid.is_blank() {
        return StagedAnalysis {
            result: AnalysisResult {
                is_blank: true,
                ..AnalysisResult::default()
            },
            label: Label::Blank,
            dimensions,
            flooded: None,
            corners: None,
            has_lines: false,
        };
    }

    let library = PatternLibrary::standard();
    let flooded = flood_from_border(grid);
    let is_closed = flood::enclosed_cells(&flooded) > 0;
    let corners = scan_corners(grid, library);

    let result = AnalysisResult {
        is_blank: false,
        is_closed,
        corner_count: corners.count(),
    };
    StagedAnalysis {
        result,
        label: classify::classify_result(&result),
        dimensions,
        flooded: Some(flooded),
        corners: Some(corners),
        has_lines: has_lines(grid, library),
    }
}

/// Classify an in-memory grid.
#[must_use]
pub fn classify_grid(grid: &Grid) -> Classification {
    analyze_staged(grid).classification()
}

/// Decode image bytes and classify every pixel through the configured
/// palette.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if the palette is invalid.
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(image_bytes: &[u8], config: &AnalysisConfig) -> Result<Grid, PipelineError> {
    config.validate()?;
    if image_bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    let image = image::load_from_memory(image_bytes)?.to_rgba8();
    Ok(Grid::from_image(&image, &config.palette))
}

/// Run the full pipeline on encoded image bytes (PNG, JPEG, BMP, WebP).
///
/// # Errors
///
/// See [`decode`].
pub fn process(
    image_bytes: &[u8],
    config: &AnalysisConfig,
) -> Result<Classification, PipelineError> {
    let grid = decode(image_bytes, config)?;
    Ok(classify_grid(&grid))
}
