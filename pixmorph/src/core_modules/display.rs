// THEORY:
// The display surface is the engine's only outbound dependency. It is modelled as an
// explicit resource object handed to whoever drives rendering, rather than as
// process-wide drawing state, so none of the transform code knows a screen exists.
//
// The contract has two calls, used in this order:
// 1.  `configure` once per session, sizing the drawing area to the image.
// 2.  `render` once per frame, drawing every pixel as a unit cell and presenting.
//
// Concrete surfaces (terminal, PNG sequences) live in the viewer crate. This module
// ships `RecordingSurface`, which keeps frames in memory.

use crate::core_modules::error::SurfaceError;
use crate::core_modules::grid::{Dimensions, PixelGrid};

/// A canvas that can be sized to an image and then asked to draw frames.
pub trait DisplaySurface {
    /// Sizes the drawing area to `dimensions` pixels.
    fn configure(&mut self, dimensions: Dimensions) -> Result<(), SurfaceError>;

    /// Draws every pixel of `grid` and presents the result.
    fn render(&mut self, grid: &PixelGrid) -> Result<(), SurfaceError>;
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn configure(&mut self, dimensions: Dimensions) -> Result<(), SurfaceError> {
        (**self).configure(dimensions)
    }

    fn render(&mut self, grid: &PixelGrid) -> Result<(), SurfaceError> {
        (**self).render(grid)
    }
}

/// Checks a frame against the size a surface was configured with.
pub fn check_frame(
    configured: Option<Dimensions>,
    grid: &PixelGrid,
) -> Result<Dimensions, SurfaceError> {
    let configured = configured.ok_or(SurfaceError::NotConfigured)?;
    if configured != grid.dimensions() {
        return Err(SurfaceError::SizeMismatch {
            configured,
            frame: grid.dimensions(),
        });
    }
    Ok(configured)
}

/// An in-memory surface that records every configuration and rendered frame.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    configured: Vec<Dimensions>,
    frames: Vec<PixelGrid>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every size passed to `configure`, in call order.
    pub fn configurations(&self) -> &[Dimensions] {
        &self.configured
    }

    pub fn frames(&self) -> &[PixelGrid] {
        &self.frames
    }
}

impl DisplaySurface for RecordingSurface {
    fn configure(&mut self, dimensions: Dimensions) -> Result<(), SurfaceError> {
        self.configured.push(dimensions);
        Ok(())
    }

    fn render(&mut self, grid: &PixelGrid) -> Result<(), SurfaceError> {
        check_frame(self.configured.last().copied(), grid)?;
        self.frames.push(grid.clone());
        Ok(())
    }
}
