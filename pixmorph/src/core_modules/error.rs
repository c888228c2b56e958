// THEORY:
// Error taxonomy for the engine. Transforms fail fast: an invalid argument or a
// violated precondition is reported before any pixel is produced, so callers never
// see partial output.

use crate::core_modules::grid::Dimensions;
use thiserror::Error;

/// Errors raised by the pure grid and color transforms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("grid dimensions must be at least 1x1, got {0}")]
    InvalidDimensions(Dimensions),

    #[error("a {dimensions} grid needs {expected} pixels, got {found}")]
    PixelCount {
        dimensions: Dimensions,
        expected: usize,
        found: usize,
    },

    #[error("row {row} has {found} pixels, expected {expected}")]
    JaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cannot blend a {left} grid with a {right} grid")]
    DimensionMismatch { left: Dimensions, right: Dimensions },

    #[error("blend weight {0} is outside [0, 1]")]
    InvalidBlendWeight(f64),

    #[error("a morph needs at least one step")]
    InvalidStepCount,
}

/// Errors raised by a display surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("render called before the surface was configured")]
    NotConfigured,

    #[error("surface is configured for {configured} but the frame is {frame}")]
    SizeMismatch {
        configured: Dimensions,
        frame: Dimensions,
    },

    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

/// Errors raised while driving a morph animation.
#[derive(Debug, Error)]
pub enum MorphError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("display surface failed: {0}")]
    Surface(#[from] SurfaceError),
}
