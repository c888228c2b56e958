// THEORY:
// The compositor lifts `color::blend` from single pixels to whole grids. It is the
// only grid operation with a precondition on two inputs: both grids must have the
// same dimensions. The check runs before any pixel is read, and a mismatch is an
// error rather than a silent crop or pad.

use crate::core_modules::color::{self, BlendWeight};
use crate::core_modules::error::TransformError;
use crate::core_modules::grid::PixelGrid;

/// Blends two equal-sized grids: pixel `(i, j)` is `color::blend(grid1[i][j], grid2[i][j], alpha)`.
pub fn blend(
    grid1: &PixelGrid,
    grid2: &PixelGrid,
    alpha: BlendWeight,
) -> Result<PixelGrid, TransformError> {
    if !grid1.same_dimensions(grid2) {
        return Err(TransformError::DimensionMismatch {
            left: grid1.dimensions(),
            right: grid2.dimensions(),
        });
    }

    Ok(PixelGrid::generate(grid1.dimensions(), |row, col| {
        color::blend(grid1[(row, col)], grid2[(row, col)], alpha)
    }))
}
