// THEORY:
// This file is the entry point for the `pixmorph` library crate.
//
// The building blocks live in `core_modules`: the pixel and grid data model, the
// per-pixel color operations, whole-grid geometry transforms, the compositor, the
// display-surface contract and the plain-text pixel map reader. The `morph` module
// sits on top of them and is the API most callers want. The re-exports below make
// the common types reachable from the crate root.

pub mod core_modules;
pub mod morph;

pub use crate::core_modules::color::{self, BlendWeight};
pub use crate::core_modules::compositor;
pub use crate::core_modules::display::{DisplaySurface, RecordingSurface};
pub use crate::core_modules::error::{MorphError, SurfaceError, TransformError};
pub use crate::core_modules::geometry;
pub use crate::core_modules::grid::{Dimensions, PixelGrid};
pub use crate::core_modules::pixel::Pixel;
pub use crate::core_modules::ppm::{self, PpmError};
pub use crate::morph::{
    DEFAULT_FRAME_DELAY, MorphConfig, MorphDriver, MorphFrame, MorphSequence, MorphSummary,
};
