// THEORY:
// The `PixelGrid` is the shared currency of the engine. Readers produce one, every
// transform consumes one or two and returns a freshly allocated one, and display
// surfaces draw one.
//
// Key architectural principles:
// 1.  **Dense, row-major storage**: pixels live in a single flattened `Vec<Pixel>`.
//     Row 0 is the top of the image and column 0 is the left edge; pixel `(row, col)`
//     sits at `row * width + col`.
// 2.  **Never jagged, never empty**: every constructor checks that both dimensions are
//     at least one and that the pixel count matches `width * height`. Code that holds
//     a `PixelGrid` can index any in-bounds coordinate without further checks.
// 3.  **Immutable after construction**: there are no mutable accessors. Transforms
//     build new grids, so a source and target can be reused across every frame of a
//     morph without copying.

use crate::core_modules::error::TransformError;
use crate::core_modules::pixel::Pixel;
use std::fmt;
use std::ops::Index;

/// Width and height of a grid, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Rejects sizes that would produce an empty grid.
    pub fn validate(self) -> Result<Self, TransformError> {
        if self.width == 0 || self.height == 0 {
            Err(TransformError::InvalidDimensions(self))
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangular, row-major image of RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    dimensions: Dimensions,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// Builds a grid from a flattened, row-major pixel buffer.
    pub fn new(width: usize, height: usize, pixels: Vec<Pixel>) -> Result<Self, TransformError> {
        let dimensions = Dimensions::new(width, height).validate()?;
        if pixels.len() != dimensions.area() {
            return Err(TransformError::PixelCount {
                dimensions,
                expected: dimensions.area(),
                found: pixels.len(),
            });
        }
        Ok(Self { dimensions, pixels })
    }

    /// Builds a grid from nested rows. Every row must have the same length as the first.
    pub fn from_rows(rows: Vec<Vec<Pixel>>) -> Result<Self, TransformError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        Dimensions::new(width, height).validate()?;

        let mut pixels = Vec::with_capacity(width * height);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(TransformError::JaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            pixels.extend(cells);
        }
        Self::new(width, height, pixels)
    }

    /// Builds a grid by evaluating `f(row, col)` for every coordinate.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self, TransformError>
    where
        F: FnMut(usize, usize) -> Pixel,
    {
        let dimensions = Dimensions::new(width, height).validate()?;
        Ok(Self::generate(dimensions, f))
    }

    /// A grid where every pixel is `pixel`.
    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Result<Self, TransformError> {
        Self::from_fn(width, height, |_, _| pixel)
    }

    /// Infallible constructor for callers that already hold validated dimensions.
    pub(crate) fn generate<F>(dimensions: Dimensions, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Pixel,
    {
        let mut pixels = Vec::with_capacity(dimensions.area());
        for row in 0..dimensions.height {
            for col in 0..dimensions.width {
                pixels.push(f(row, col));
            }
        }
        Self { dimensions, pixels }
    }

    pub fn width(&self) -> usize {
        self.dimensions.width
    }

    pub fn height(&self) -> usize {
        self.dimensions.height
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn same_dimensions(&self, other: &PixelGrid) -> bool {
        self.dimensions == other.dimensions
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Pixel> {
        if row < self.height() && col < self.width() {
            self.pixels.get(row * self.width() + col)
        } else {
            None
        }
    }

    /// The flattened, row-major pixel buffer.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Iterates over rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Pixel]> + '_ {
        self.pixels.chunks_exact(self.width())
    }

    pub fn to_rows(&self) -> Vec<Vec<Pixel>> {
        self.rows().map(<[Pixel]>::to_vec).collect()
    }
}

impl Index<(usize, usize)> for PixelGrid {
    type Output = Pixel;

    /// Panics when `(row, col)` is outside the grid, like slice indexing.
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        assert!(
            row < self.height() && col < self.width(),
            "pixel ({row}, {col}) is outside a {} grid",
            self.dimensions
        );
        &self.pixels[row * self.width() + col]
    }
}

impl fmt::Display for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (col, pixel) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str("  ")?;
                }
                write!(f, "{pixel}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
