//! Shared types for the katachi classification pipeline.

use serde::{Deserialize, Serialize};

use crate::classify::Label;

/// Re-export `RgbaImage` so downstream crates can hand decoded images
/// to the pipeline without depending on `image` directly.
pub use image::RgbaImage;

/// Semantic state of a single grid cell.
///
/// Raw pixel colors are mapped onto this closed set by
/// [`Palette::classify`]. [`FloodMarker`](Self::FloodMarker) and
/// [`Erased`](Self::Erased) only ever appear in scratch copies owned by
/// the closure and corner passes respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelState {
    /// Canvas color (white).
    #[default]
    Background,
    /// Figure color (black).
    Foreground,
    /// Visited by the border flood.
    FloodMarker,
    /// Overwritten by corner erasure. Samples read it as background.
    Erased,
    /// Matched none of the reference colors (e.g. anti-aliasing).
    ///
    /// Does not block the flood and is never foreground.
    Unknown,
}

impl PixelState {
    /// Whether the flood may not pass through this cell.
    #[must_use]
    pub const fn blocks_flood(self) -> bool {
        matches!(self, Self::Foreground | Self::FloodMarker)
    }
}

/// The reference colors that raw pixels are matched against.
///
/// Colors are `[r, g, b, a]`. Matching is exact per channel; alpha only
/// takes part when [`match_alpha`](Self::match_alpha) is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Canvas color.
    pub background: [u8; 4],
    /// Figure color.
    pub foreground: [u8; 4],
    /// Color of flood-visited cells in a rendered flood scratch image.
    pub flood_marker: [u8; 4],
    /// Color of erased cells in a rendered erasure scratch image.
    pub erase_marker: [u8; 4],
    /// Compare the alpha channel too.
    ///
    /// Off by default: decoders report opaque pixels with alpha 255
    /// while bitmap sources commonly leave alpha at zero.
    pub match_alpha: bool,
}

impl Palette {
    /// Default canvas color (white).
    pub const DEFAULT_BACKGROUND: [u8; 4] = [255, 255, 255, 255];
    /// Default figure color (black).
    pub const DEFAULT_FOREGROUND: [u8; 4] = [0, 0, 0, 255];
    /// Default flood marker color (red).
    pub const DEFAULT_FLOOD_MARKER: [u8; 4] = [255, 0, 0, 255];
    /// Default erase marker color (green).
    pub const DEFAULT_ERASE_MARKER: [u8; 4] = [0, 255, 0, 255];

    /// Map a raw pixel to its semantic state.
    ///
    /// Any color that is none of the four reference colors classifies as
    /// [`PixelState::Unknown`].
    #[must_use]
    pub fn classify(&self, pixel: image::Rgba<u8>) -> PixelState {
        let raw = pixel.0;
        if self.same_color(raw, self.background) {
            PixelState::Background
        } else if self.same_color(raw, self.foreground) {
            PixelState::Foreground
        } else if self.same_color(raw, self.flood_marker) {
            PixelState::FloodMarker
        } else if self.same_color(raw, self.erase_marker) {
            PixelState::Erased
        } else {
            PixelState::Unknown
        }
    }

    /// The reference color for a state, used when rendering a grid back
    /// into an image. [`PixelState::Unknown`] has no reference color and
    /// renders as mid gray.
    #[must_use]
    pub const fn color_of(&self, state: PixelState) -> [u8; 4] {
        match state {
            PixelState::Background => self.background,
            PixelState::Foreground => self.foreground,
            PixelState::FloodMarker => self.flood_marker,
            PixelState::Erased => self.erase_marker,
            PixelState::Unknown => [128, 128, 128, 255],
        }
    }

    /// Check that the four reference colors are pairwise distinguishable.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] naming the first pair of
    /// reference colors that compare equal under this palette's matching
    /// rule.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let named = [
            ("background", self.background),
            ("foreground", self.foreground),
            ("flood_marker", self.flood_marker),
            ("erase_marker", self.erase_marker),
        ];
        for (i, &(name_a, a)) in named.iter().enumerate() {
            for &(name_b, b) in &named[i + 1..] {
                if self.same_color(a, b) {
                    return Err(PipelineError::InvalidConfig(format!(
                        "palette colors {name_a} and {name_b} are indistinguishable"
                    )));
                }
            }
        }
        Ok(())
    }

    fn same_color(&self, a: [u8; 4], b: [u8; 4]) -> bool {
        a[..3] == b[..3] && (!self.match_alpha || a[3] == b[3])
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Self::DEFAULT_BACKGROUND,
            foreground: Self::DEFAULT_FOREGROUND,
            flood_marker: Self::DEFAULT_FLOOD_MARKER,
            erase_marker: Self::DEFAULT_ERASE_MARKER,
            match_alpha: false,
        }
    }
}

/// Configuration for the classification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Reference colors for pixel classification.
    pub palette: Palette,
}

impl AnalysisConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the palette is invalid.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.palette.validate()
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

/// Raw findings of the shape analysis, produced once per image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// No foreground cell anywhere.
    pub is_blank: bool,
    /// Some background region is unreachable from the border.
    pub is_closed: bool,
    /// Number of corner pattern matches after erasure.
    pub corner_count: usize,
}

/// Final output: the figure label plus the raw corner count for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Figure label from the decision table.
    pub label: Label,
    /// Corner count the label was derived from.
    pub corner_count: usize,
    /// Dimensions of the analyzed grid.
    pub dimensions: Dimensions,
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image data was empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// A sample window does not fit inside the grid.
    #[error("sample window at row {row}, col {col} exceeds {width}x{height} grid")]
    OutOfBounds {
        /// Requested top row.
        row: usize,
        /// Requested left column.
        col: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// A cell buffer does not match the declared grid size.
    #[error("size mismatch: expected {expected} cells, got {actual}")]
    SizeMismatch {
        /// `width * height`.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },

    /// ASCII grid text could not be parsed.
    #[error("invalid ASCII grid: {0}")]
    AsciiParse(String),
}
