// THEORY:
// The `morph` module is the top-level API of the engine. It animates a transition
// from a source grid to a target grid in `n` discrete steps and hands each frame to a
// display surface.
//
// The animation is a small state machine:
//
//     Reconcile -> Emit(n) -> Emit(n-1) -> ... -> Emit(0) -> Done
//
// 1.  **Reconcile**: if the source and target sizes differ, the source is resized to
//     the target with nearest-neighbour scaling. The target is never resized. This
//     happens once, before any frame exists, and is logged as a warning.
// 2.  **Emit(i)**: frame `i` is `compositor::blend(source, target, i / n)`. The first
//     frame (weight 1) is the pure source and the last (weight 0) the pure target.
// 3.  **Done**: reached after exactly `n + 1` frames. There is no pause, resume or
//     cancel; once started the sequence runs to completion.
//
// `MorphSequence` is the pure half (an iterator of frames, no I/O, no timing).
// `MorphDriver` is the paced half: it configures the surface once, renders each frame
// and sleeps a fixed delay between frames. That sleep is the only suspension point.

use crate::core_modules::color::BlendWeight;
use crate::core_modules::compositor;
use crate::core_modules::display::DisplaySurface;
use crate::core_modules::error::{MorphError, TransformError};
use crate::core_modules::geometry;
use crate::core_modules::grid::{Dimensions, PixelGrid};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause between two rendered frames unless configured otherwise.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(500);

/// Tunable behaviour of the morph driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphConfig {
    /// Fixed pause after each rendered frame except the last.
    pub frame_delay: Duration,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            frame_delay: DEFAULT_FRAME_DELAY,
        }
    }
}

/// One blended frame of a morph.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphFrame {
    /// The step counter `i`, running from `n` down to `0`.
    pub step: u32,
    /// Weight of the source image in this frame, `step / n`.
    pub alpha: BlendWeight,
    pub grid: PixelGrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Emit(u32),
    Done,
}

/// The frames of a morph, produced lazily from source weight 1 down to 0.
#[derive(Debug, Clone)]
pub struct MorphSequence {
    source: PixelGrid,
    target: PixelGrid,
    steps: u32,
    reconciled: bool,
    phase: Phase,
}

impl MorphSequence {
    /// Validates `steps`, then reconciles the source to the target's size.
    pub fn new(source: PixelGrid, target: PixelGrid, steps: u32) -> Result<Self, TransformError> {
        if steps == 0 {
            return Err(TransformError::InvalidStepCount);
        }

        let reconciled = !source.same_dimensions(&target);
        let source = if reconciled {
            warn!(
                source = %source.dimensions(),
                target = %target.dimensions(),
                "image dimensions mismatch, scaling source to target"
            );
            geometry::scale_to(&source, target.dimensions())?
        } else {
            source
        };

        Ok(Self {
            source,
            target,
            steps,
            reconciled,
            phase: Phase::Emit(steps),
        })
    }

    /// Whether the source had to be rescaled to match the target.
    pub fn reconciled(&self) -> bool {
        self.reconciled
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Size of every frame, which is always the target's size.
    pub fn dimensions(&self) -> Dimensions {
        self.target.dimensions()
    }

    /// The source after reconciliation.
    pub fn source(&self) -> &PixelGrid {
        &self.source
    }

    fn frame(&self, step: u32) -> Result<MorphFrame, TransformError> {
        let alpha = BlendWeight::step(step, self.steps)?;
        let grid = compositor::blend(&self.source, &self.target, alpha)?;
        Ok(MorphFrame { step, alpha, grid })
    }
}

impl Iterator for MorphSequence {
    type Item = Result<MorphFrame, TransformError>;

    fn next(&mut self) -> Option<Self::Item> {
        let Phase::Emit(step) = self.phase else {
            return None;
        };
        self.phase = match step.checked_sub(1) {
            Some(next) => Phase::Emit(next),
            None => Phase::Done,
        };
        let frame = self.frame(step);
        if frame.is_err() {
            self.phase = Phase::Done;
        }
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.phase {
            Phase::Emit(step) => step as usize + 1,
            Phase::Done => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MorphSequence {}

/// What a completed morph produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MorphSummary {
    /// Frames rendered, always `steps + 1`.
    pub frames: u32,
    /// Whether the source was rescaled to the target's size.
    pub reconciled: bool,
    pub dimensions: Dimensions,
}

/// Drives a morph against a display surface with a fixed delay between frames.
#[derive(Debug, Clone, Default)]
pub struct MorphDriver {
    config: MorphConfig,
}

impl MorphDriver {
    pub fn new(config: MorphConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    /// Morphs `source` into `target` in `steps` steps, rendering all `steps + 1` frames.
    ///
    /// `steps == 0` is rejected before the surface is touched.
    pub async fn run<S>(
        &self,
        source: PixelGrid,
        target: PixelGrid,
        steps: u32,
        surface: &mut S,
    ) -> Result<MorphSummary, MorphError>
    where
        S: DisplaySurface + ?Sized,
    {
        let mut sequence = MorphSequence::new(source, target, steps)?;
        let dimensions = sequence.dimensions();
        let reconciled = sequence.reconciled();
        info!(%dimensions, steps = sequence.steps(), reconciled, "starting morph");

        surface.configure(dimensions)?;

        let mut frames = 0;
        while let Some(frame) = sequence.next() {
            let frame = frame?;
            debug!(step = frame.step, alpha = frame.alpha.value(), "rendering frame");
            surface.render(&frame.grid)?;
            frames += 1;

            if sequence.len() > 0 && !self.config.frame_delay.is_zero() {
                tokio::time::sleep(self.config.frame_delay).await;
            }
        }

        info!(frames, "morph complete");
        Ok(MorphSummary {
            frames,
            reconciled,
            dimensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::display::RecordingSurface;
    use crate::core_modules::error::SurfaceError;
    use crate::core_modules::pixel::Pixel;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Accepts `healthy` frames, then fails every later render.
    struct FlakySurface {
        healthy: usize,
        attempts: usize,
    }

    impl DisplaySurface for FlakySurface {
        fn configure(&mut self, _dimensions: Dimensions) -> Result<(), SurfaceError> {
            Ok(())
        }

        fn render(&mut self, _grid: &PixelGrid) -> Result<(), SurfaceError> {
            self.attempts += 1;
            if self.attempts > self.healthy {
                return Err(SurfaceError::Backend("display went away".into()));
            }
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn solid(width: usize, height: usize, pixel: Pixel) -> PixelGrid {
        PixelGrid::filled(width, height, pixel).unwrap()
    }

    #[test]
    fn sequence_counts_down_from_source_to_target() {
        let source = solid(2, 2, Pixel::new(200, 0, 0));
        let target = solid(2, 2, Pixel::new(0, 0, 200));
        let frames: Vec<_> = MorphSequence::new(source.clone(), target.clone(), 4)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(frames.len(), 5);
        let steps: Vec<u32> = frames.iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![4, 3, 2, 1, 0]);
        assert_eq!(frames[0].grid, source);
        assert_eq!(frames[2].grid, solid(2, 2, Pixel::new(100, 0, 100)));
        assert_eq!(frames[4].grid, target);
    }

    #[test]
    fn sequence_reports_exact_length() {
        let grid = solid(1, 1, Pixel::BLACK);
        let mut sequence = MorphSequence::new(grid.clone(), grid, 3).unwrap();
        assert_eq!(sequence.len(), 4);
        sequence.next();
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.by_ref().count(), 3);
        assert_eq!(sequence.len(), 0);
        assert!(sequence.next().is_none());
    }

    #[test]
    fn zero_steps_are_rejected() {
        let grid = solid(1, 1, Pixel::BLACK);
        assert_eq!(
            MorphSequence::new(grid.clone(), grid, 0).err(),
            Some(TransformError::InvalidStepCount)
        );
    }

    #[test]
    fn mismatched_source_is_scaled_to_target() {
        let source = PixelGrid::from_fn(4, 4, |row, col| Pixel::gray((row * 4 + col) as u8)).unwrap();
        let target = solid(2, 2, Pixel::WHITE);
        let sequence = MorphSequence::new(source.clone(), target, 2).unwrap();
        assert!(sequence.reconciled());
        assert_eq!(sequence.source(), &geometry::scale(&source, 2, 2).unwrap());
        assert_eq!(sequence.dimensions(), Dimensions::new(2, 2));
    }

    #[test]
    fn reconciliation_is_logged_as_a_warning() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let source = solid(4, 4, Pixel::WHITE);
            let target = solid(2, 2, Pixel::BLACK);
            MorphSequence::new(source, target, 1).unwrap();
        });

        let output = log.contents();
        assert!(output.contains("WARN"), "log: {output}");
        assert!(output.contains("scaling source to target"), "log: {output}");
        assert!(output.contains("source=4x4"), "log: {output}");
        assert!(output.contains("target=2x2"), "log: {output}");
    }

    #[test]
    fn matching_sizes_log_no_warning() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let grid = solid(2, 2, Pixel::WHITE);
            MorphSequence::new(grid.clone(), grid, 1).unwrap();
        });

        assert!(log.contents().is_empty());
    }

    #[tokio::test]
    async fn surface_failure_stops_the_morph() {
        let driver = MorphDriver::new(MorphConfig {
            frame_delay: Duration::ZERO,
        });
        let mut surface = FlakySurface {
            healthy: 2,
            attempts: 0,
        };
        let result = driver
            .run(
                solid(2, 2, Pixel::WHITE),
                solid(2, 2, Pixel::BLACK),
                5,
                &mut surface,
            )
            .await;

        assert!(matches!(
            result,
            Err(MorphError::Surface(SurfaceError::Backend(_)))
        ));
        assert_eq!(surface.attempts, 3);
    }

    #[tokio::test]
    async fn driver_renders_every_frame_once_configured() {
        let driver = MorphDriver::new(MorphConfig {
            frame_delay: Duration::ZERO,
        });
        let mut surface = RecordingSurface::new();
        let summary = driver
            .run(
                solid(3, 2, Pixel::WHITE),
                solid(3, 2, Pixel::BLACK),
                2,
                &mut surface,
            )
            .await
            .unwrap();

        assert_eq!(summary.frames, 3);
        assert!(!summary.reconciled);
        assert_eq!(surface.configurations(), &[Dimensions::new(3, 2)]);
        assert_eq!(surface.frames().len(), 3);
    }

    #[tokio::test]
    async fn driver_rejects_zero_steps_before_configuring() {
        let driver = MorphDriver::default();
        let mut surface = RecordingSurface::new();
        let grid = solid(1, 1, Pixel::BLACK);
        let result = driver.run(grid.clone(), grid, 0, &mut surface).await;

        assert!(matches!(
            result,
            Err(MorphError::Transform(TransformError::InvalidStepCount))
        ));
        assert!(surface.configurations().is_empty());
        assert!(surface.frames().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn driver_pauses_between_frames_only() {
        let driver = MorphDriver::default();
        let mut surface = RecordingSurface::new();
        let grid = solid(1, 1, Pixel::BLACK);

        let started = tokio::time::Instant::now();
        driver.run(grid.clone(), grid, 3, &mut surface).await.unwrap();

        assert_eq!(surface.frames().len(), 4);
        let elapsed = started.elapsed();
        assert!(elapsed >= DEFAULT_FRAME_DELAY * 3, "elapsed {elapsed:?}");
        assert!(elapsed < DEFAULT_FRAME_DELAY * 4, "elapsed {elapsed:?}");
    }

    #[test]
    fn default_delay_is_half_a_second() {
        assert_eq!(MorphConfig::default().frame_delay, Duration::from_millis(500));
    }
}
