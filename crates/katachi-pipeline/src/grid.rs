//! Owned 2D grid of classified pixel states.
//!
//! Row-major, origin top-left. Every analysis pass that mutates cells
//! (flood, erasure) works on its own clone, so the grid produced from
//! the source image is never perturbed.

use image::{GenericImageView, Pixel};

use crate::types::{Dimensions, Palette, PipelineError, PixelState, RgbaImage};

/// A `width x height` grid of [`PixelState`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<PixelState>,
}

impl Grid {
    /// A grid with every cell set to [`PixelState::Background`].
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, PixelState::Background)
    }

    /// A grid with every cell set to `state`.
    #[must_use]
    pub fn filled(width: usize, height: usize, state: PixelState) -> Self {
        Self {
            width,
            height,
            cells: vec![state; width * height],
        }
    }

    /// Wrap an existing row-major cell buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::SizeMismatch`] if `cells.len()` is not
    /// `width * height`.
    pub fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<PixelState>,
    ) -> Result<Self, PipelineError> {
        let expected = width
            .checked_mul(height)
            .ok_or(PipelineError::SizeMismatch {
                expected: usize::MAX,
                actual: cells.len(),
            })?;
        if cells.len() != expected {
            return Err(PipelineError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Classify every pixel of an RGB or RGBA image through `palette`.
    #[must_use]
    pub fn from_image<I>(image: &I, palette: &Palette) -> Self
    where
        I: GenericImageView,
        I::Pixel: Pixel<Subpixel = u8>,
    {
        let (width, height) = image.dimensions();
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| palette.classify(image.get_pixel(x, y).to_rgba()))
            .collect();
        Self {
            width: width as usize,
            height: height as usize,
            cells,
        }
    }

    /// Render the grid back into an image using the palette's reference
    /// colors.
    ///
    /// Returns `None` if a dimension does not fit in `u32`.
    #[must_use]
    pub fn to_image(&self, palette: &Palette) -> Option<RgbaImage> {
        let width = u32::try_from(self.width).ok()?;
        let height = u32::try_from(self.height).ok()?;
        let raw = self
            .cells
            .iter()
            .flat_map(|&state| palette.color_of(state))
            .collect();
        RgbaImage::from_raw(width, height, raw)
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Width and height together.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// All cells, row-major.
    #[must_use]
    pub fn cells(&self) -> &[PixelState] {
        &self.cells
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[PixelState]> {
        self.cells.chunks(self.width.max(1))
    }

    /// The state at (`row`, `col`), or `None` outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<PixelState> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Mutable access to the cell at (`row`, `col`).
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut PixelState> {
        self.index(row, col).map(|i| &mut self.cells[i])
    }

    /// Number of cells in `state`.
    #[must_use]
    pub fn count(&self, state: PixelState) -> usize {
        self.cells.iter().filter(|&&s| s == state).count()
    }

    /// Whether any cell is in `state`.
    #[must_use]
    pub fn contains(&self, state: PixelState) -> bool {
        self.cells.contains(&state)
    }

    /// True iff no foreground cell exists anywhere.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        !self.contains(PixelState::Foreground)
    }

    const fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }
}
