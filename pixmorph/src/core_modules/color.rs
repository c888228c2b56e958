// THEORY:
// Per-pixel color operations: each function produces one output color from one or
// two input colors, with no knowledge of neighbours or of the grid.
//
// All channel arithmetic happens in f64 and is truncated back into a channel with an
// `as` cast. Truncation, not rounding, is the contract: grayscale of (100,150,200) is
// 140 even though the exact luma is 140.75.

use crate::core_modules::error::TransformError;
use crate::core_modules::pixel::{Channel, Pixel};

/// Fractional contribution of the "source" color in a blend, always within `[0, 1]`.
///
/// A weight of `1.0` yields the source unchanged and `0.0` yields the target.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlendWeight(f64);

impl BlendWeight {
    pub const SOURCE: BlendWeight = BlendWeight(1.0);
    pub const TARGET: BlendWeight = BlendWeight(0.0);

    /// Rejects NaN and anything outside `[0, 1]`; out-of-range weights are never clamped.
    pub fn new(alpha: f64) -> Result<Self, TransformError> {
        if (0.0..=1.0).contains(&alpha) {
            Ok(BlendWeight(alpha))
        } else {
            Err(TransformError::InvalidBlendWeight(alpha))
        }
    }

    /// The weight `step / steps` used by frame `step` of an animation.
    pub fn step(step: u32, steps: u32) -> Result<Self, TransformError> {
        if steps == 0 {
            return Err(TransformError::InvalidStepCount);
        }
        Self::new(step as f64 / steps as f64)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The weight given to the target color, `1 - alpha`.
    pub fn complement(self) -> f64 {
        1.0 - self.0
    }
}

/// The gray pixel whose channels all equal the truncated luminance of `pixel`.
pub fn luminance(pixel: Pixel) -> Pixel {
    Pixel::gray(pixel.luminance() as Channel)
}

/// Linear combination `alpha * c1 + (1 - alpha) * c2`, truncated per channel.
pub fn blend(c1: Pixel, c2: Pixel, alpha: BlendWeight) -> Pixel {
    Pixel::new(
        blend_channel(c1.red, c2.red, alpha),
        blend_channel(c1.green, c2.green, alpha),
        blend_channel(c1.blue, c2.blue, alpha),
    )
}

fn blend_channel(v1: Channel, v2: Channel, alpha: BlendWeight) -> Channel {
    // a*v + (1-a)*v can land just under v in f64, which truncation would turn into v-1.
    if v1 == v2 {
        return v1;
    }
    (v1 as f64 * alpha.value() + v2 as f64 * alpha.complement()) as Channel
}
