// THEORY:
// A display surface that turns every rendered frame into a PNG file, so a morph can
// be inspected frame by frame or stitched into a video afterwards. Each image pixel
// becomes a `cell_size` x `cell_size` square of one color.
//
// Files are named `frame_0000.png`, `frame_0001.png`, ... in render order. `finish`
// writes a `frames.json` manifest listing them.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use pixmorph::core_modules::display::check_frame;
use pixmorph::{Dimensions, DisplaySurface, PixelGrid, SurfaceError};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILE: &str = "frames.json";

/// Largest RGB buffer a single rasterized frame may need.
pub const MAX_FRAME_BYTES: u64 = 256 * 1024 * 1024;

/// One entry of the frame manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRecord {
    pub index: usize,
    pub file: String,
    /// Size of the rendered image, before cell scaling.
    pub dimensions: Dimensions,
}

#[derive(Serialize)]
struct Manifest<'a> {
    cell_size: u32,
    frames: &'a [FrameRecord],
}

pub struct PngSequence {
    dir: PathBuf,
    cell_size: u32,
    configured: Option<Dimensions>,
    frames: Vec<FrameRecord>,
}

impl PngSequence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cell_size: 1,
            configured: None,
            frames: Vec::new(),
        }
    }

    /// Draws each image pixel as a `cell_size` square. Zero is treated as one.
    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Writes the manifest and returns its path.
    pub fn finish(&self) -> Result<PathBuf, SurfaceError> {
        let path = self.dir.join(MANIFEST_FILE);
        let manifest = Manifest {
            cell_size: self.cell_size,
            frames: &self.frames,
        };
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, &manifest)
            .map_err(|e| SurfaceError::Backend(Box::new(e)))?;
        Ok(path)
    }

    fn rasterize(&self, grid: &PixelGrid) -> Result<RgbImage, SurfaceError> {
        let cell = self.cell_size;
        let scaled = |len: usize| {
            u32::try_from(len)
                .ok()
                .and_then(|len| len.checked_mul(cell))
                .ok_or_else(|| {
                    SurfaceError::Backend(
                        format!("{} grid is too large for cell size {cell}", grid.dimensions())
                            .into(),
                    )
                })
        };
        let width = scaled(grid.width())?;
        let height = scaled(grid.height())?;

        let bytes = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|area| area.checked_mul(3))
            .filter(|bytes| *bytes <= MAX_FRAME_BYTES);
        if bytes.is_none() {
            return Err(SurfaceError::Backend(
                format!(
                    "a {width}x{height} frame exceeds the {MAX_FRAME_BYTES} byte limit (cell size {cell})"
                )
                .into(),
            ));
        }

        Ok(RgbImage::from_fn(width, height, |x, y| {
            let pixel = grid[((y / cell) as usize, (x / cell) as usize)];
            Rgb(pixel.into())
        }))
    }
}

fn save(path: &Path, image: &RgbImage) -> Result<(), image::ImageError> {
    let output = BufWriter::new(File::create(path)?);
    let encoder = PngEncoder::new(output);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

impl DisplaySurface for PngSequence {
    fn configure(&mut self, dimensions: Dimensions) -> Result<(), SurfaceError> {
        fs::create_dir_all(&self.dir)?;
        self.configured = Some(dimensions);
        debug!(dir = %self.dir.display(), %dimensions, "png sequence configured");
        Ok(())
    }

    fn render(&mut self, grid: &PixelGrid) -> Result<(), SurfaceError> {
        let dimensions = check_frame(self.configured, grid)?;
        let index = self.frames.len();
        let file = format!("frame_{index:04}.png");
        let image = self.rasterize(grid)?;
        save(&self.dir.join(&file), &image).map_err(|e| SurfaceError::Backend(Box::new(e)))?;
        debug!(%file, "wrote frame");
        self.frames.push(FrameRecord {
            index,
            file,
            dimensions,
        });
        Ok(())
    }
}
