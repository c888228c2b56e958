// THEORY:
// Whole-grid transforms. Each function reads its input grid and returns a brand-new
// grid; the input is never touched.
//
// - `grayscale` maps `color::luminance` over every pixel.
// - `flip_horizontal` / `flip_vertical` mirror columns / rows.
// - `scale` is nearest-neighbour resampling. The row and column ratios are computed
//   once as original size divided by target size, and output coordinate `(i, j)`
//   reads source pixel `(floor(i * row_ratio), floor(j * col_ratio))`. There is no
//   interpolation between neighbouring source pixels.

use crate::core_modules::color;
use crate::core_modules::error::TransformError;
use crate::core_modules::grid::{Dimensions, PixelGrid};

/// A grid of the same size where every pixel is replaced by its gray luminance.
pub fn grayscale(grid: &PixelGrid) -> PixelGrid {
    PixelGrid::generate(grid.dimensions(), |row, col| {
        color::luminance(grid[(row, col)])
    })
}

/// Mirrors the grid left to right: output column `j` is input column `width - 1 - j`.
pub fn flip_horizontal(grid: &PixelGrid) -> PixelGrid {
    let last_col = grid.width() - 1;
    PixelGrid::generate(grid.dimensions(), |row, col| grid[(row, last_col - col)])
}

/// Mirrors the grid top to bottom: output row `i` is input row `height - 1 - i`.
pub fn flip_vertical(grid: &PixelGrid) -> PixelGrid {
    let last_row = grid.height() - 1;
    PixelGrid::generate(grid.dimensions(), |row, col| grid[(last_row - row, col)])
}

/// Nearest-neighbour resize to `target_width` x `target_height`.
///
/// Returns `TransformError::InvalidDimensions` when either target dimension is zero.
pub fn scale(
    grid: &PixelGrid,
    target_width: usize,
    target_height: usize,
) -> Result<PixelGrid, TransformError> {
    scale_to(grid, Dimensions::new(target_width, target_height))
}

/// [`scale`] taking the target size as [`Dimensions`].
pub fn scale_to(grid: &PixelGrid, target: Dimensions) -> Result<PixelGrid, TransformError> {
    let target = target.validate()?;

    let row_ratio = grid.height() as f64 / target.height as f64;
    let col_ratio = grid.width() as f64 / target.width as f64;

    Ok(PixelGrid::generate(target, |row, col| {
        let source_row = (row as f64 * row_ratio) as usize;
        let source_col = (col as f64 * col_ratio) as usize;
        grid[(source_row, source_col)]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::Pixel;

    fn primaries() -> PixelGrid {
        PixelGrid::from_rows(vec![
            vec![Pixel::new(255, 0, 0), Pixel::new(0, 255, 0)],
            vec![Pixel::new(0, 0, 255), Pixel::new(255, 255, 255)],
        ])
        .unwrap()
    }

    fn gradient(width: usize, height: usize) -> PixelGrid {
        PixelGrid::from_fn(width, height, |row, col| {
            Pixel::new((row * 16) as u8, (col * 16) as u8, ((row + col) * 8) as u8)
        })
        .unwrap()
    }

    #[test]
    fn flips_primaries_horizontally() {
        let flipped = flip_horizontal(&primaries());
        assert_eq!(
            flipped.to_rows(),
            vec![
                vec![Pixel::new(0, 255, 0), Pixel::new(255, 0, 0)],
                vec![Pixel::new(255, 255, 255), Pixel::new(0, 0, 255)],
            ]
        );
    }

    #[test]
    fn flips_primaries_vertically() {
        let flipped = flip_vertical(&primaries());
        assert_eq!(
            flipped.to_rows(),
            vec![
                vec![Pixel::new(0, 0, 255), Pixel::new(255, 255, 255)],
                vec![Pixel::new(255, 0, 0), Pixel::new(0, 255, 0)],
            ]
        );
    }

    #[test]
    fn flips_are_involutions() {
        for (width, height) in [(1, 1), (3, 1), (1, 4), (5, 7)] {
            let grid = gradient(width, height);
            assert_eq!(flip_horizontal(&flip_horizontal(&grid)), grid);
            assert_eq!(flip_vertical(&flip_vertical(&grid)), grid);
        }
    }

    #[test]
    fn flips_leave_input_untouched() {
        let grid = gradient(3, 3);
        let before = grid.clone();
        let _ = flip_horizontal(&grid);
        let _ = flip_vertical(&grid);
        let _ = grayscale(&grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn grayscale_pixels_have_equal_channels() {
        let gray = grayscale(&gradient(6, 5));
        assert_eq!(gray.dimensions(), Dimensions::new(6, 5));
        assert!(gray.pixels().iter().all(Pixel::is_gray));
    }

    #[test]
    fn grayscale_truncates_luminance() {
        let grid = PixelGrid::filled(1, 1, Pixel::new(100, 150, 200)).unwrap();
        assert_eq!(grayscale(&grid)[(0, 0)], Pixel::gray(140));
    }

    #[test]
    fn scale_to_same_size_is_identity() {
        for (width, height) in [(1, 1), (2, 3), (7, 5)] {
            let grid = gradient(width, height);
            assert_eq!(scale(&grid, width, height).unwrap(), grid);
        }
    }

    #[test]
    fn scale_down_picks_nearest_source_pixels() {
        let grid = gradient(4, 4);
        let scaled = scale(&grid, 2, 2).unwrap();
        assert_eq!(scaled[(0, 0)], grid[(0, 0)]);
        assert_eq!(scaled[(0, 1)], grid[(0, 2)]);
        assert_eq!(scaled[(1, 0)], grid[(2, 0)]);
        assert_eq!(scaled[(1, 1)], grid[(2, 2)]);
    }

    #[test]
    fn scale_up_repeats_source_pixels() {
        let scaled = scale(&primaries(), 4, 2).unwrap();
        assert_eq!(scaled.dimensions(), Dimensions::new(4, 2));
        assert_eq!(
            scaled.to_rows()[0],
            vec![
                Pixel::new(255, 0, 0),
                Pixel::new(255, 0, 0),
                Pixel::new(0, 255, 0),
                Pixel::new(0, 255, 0),
            ]
        );
    }

    #[test]
    fn scale_uses_independent_ratios() {
        let grid = gradient(6, 2);
        let scaled = scale(&grid, 3, 4).unwrap();
        // rows: 2/4 = 0.5 -> 0,0,1,1 ; cols: 6/3 = 2 -> 0,2,4
        assert_eq!(scaled[(1, 2)], grid[(0, 4)]);
        assert_eq!(scaled[(3, 1)], grid[(1, 2)]);
    }

    #[test]
    fn scale_rejects_zero_target() {
        let grid = gradient(2, 2);
        assert_eq!(
            scale(&grid, 0, 3),
            Err(TransformError::InvalidDimensions(Dimensions::new(0, 3)))
        );
        assert!(scale(&grid, 3, 0).is_err());
    }
}
