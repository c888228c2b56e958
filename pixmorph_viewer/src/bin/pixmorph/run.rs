use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use pixmorph::{DisplaySurface, MorphConfig, MorphDriver, PixelGrid, geometry, ppm};
use pixmorph_viewer::{PngSequence, TerminalSurface};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{MorphArgs, Operation, PrintArgs, TransformArgs};

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<PixelGrid> {
    ppm::read_ppm(path).with_context(|| format!("failed to load pixel map {}", path.display()))
}

pub async fn morph(args: MorphArgs) -> Result<()> {
    let image = args.image.context("missing IMAGE argument")?;
    let steps = args.steps.context("missing STEPS argument")?;

    let source = load(&image)?;
    let target = match &args.target {
        Some(path) => load(path)?,
        None => geometry::grayscale(&source),
    };

    let driver = MorphDriver::new(MorphConfig {
        frame_delay: Duration::from_millis(args.delay_ms),
    });
    debug!(frame_delay = ?driver.config().frame_delay, "morph configured");

    match args.frames_dir {
        Some(dir) => {
            let mut surface = PngSequence::new(dir).with_cell_size(args.cell_size);
            info!(dir = %surface.dir().display(), "writing frames as png");
            play(&driver, source, target, steps, &mut surface).await?;
            let manifest = surface.finish().context("failed to write frame manifest")?;
            info!(
                frames = surface.frames().len(),
                manifest = %manifest.display(),
                "frames written"
            );
        }
        None => {
            let mut surface = TerminalSurface::stdout();
            play(&driver, source, target, steps, &mut surface).await?;
            surface.close().context("failed to restore terminal")?;
        }
    }

    Ok(())
}

async fn play<S: DisplaySurface>(
    driver: &MorphDriver,
    source: PixelGrid,
    target: PixelGrid,
    steps: u32,
    surface: &mut S,
) -> Result<()> {
    let summary = driver
        .run(source, target, steps, surface)
        .await
        .context("morph failed")?;
    info!(
        frames = summary.frames,
        reconciled = summary.reconciled,
        dimensions = %summary.dimensions,
        "morph finished"
    );
    Ok(())
}

pub fn transform(args: TransformArgs) -> Result<()> {
    let grid = load(&args.input)?;
    let output = match args.operation {
        Operation::Grayscale => geometry::grayscale(&grid),
        Operation::FlipHorizontal => geometry::flip_horizontal(&grid),
        Operation::FlipVertical => geometry::flip_vertical(&grid),
        Operation::Scale(dimensions) => {
            geometry::scale_to(&grid, dimensions).context("failed to scale image")?
        }
    };

    ppm::write_ppm(&args.output, &output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(
        operation = ?args.operation,
        dimensions = %output.dimensions(),
        output = %args.output.display(),
        "transform written"
    );
    Ok(())
}

pub fn print(args: PrintArgs) -> Result<()> {
    let grid = load(&args.image)?;
    print!("{grid}");
    Ok(())
}
