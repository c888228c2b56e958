// THEORY:
// The `Pixel` module is the smallest unit of the engine: a "dumb" data container for
// one RGB color. Everything above it (grids, transforms, the morph driver) is built
// out of values of this type.
//
// What lives here:
// - The three 8-bit channels. There is no alpha channel; blending weights are
//   supplied by the caller, never stored on a pixel.
// - Single-pixel measurements that need no neighbours, such as the Rec. 601
//   luminance sum used by grayscale conversion.
// - Conversion into a raw `[r, g, b]` byte triplet for surfaces that fill flat
//   image buffers.
//
// Anything that combines two pixels (blending) lives in `color`.

use std::fmt;

pub type Byte = u8;
pub type Channel = Byte;
pub type Luminance = f64;

pub const CHANNELS: usize = 3;

const RED_WEIGHT: Luminance = 0.299;
const GREEN_WEIGHT: Luminance = 0.587;
const BLUE_WEIGHT: Luminance = 0.114;

/// A single RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pixel {
    /// The red channel value (0-255).
    pub red: Channel,
    /// The green channel value (0-255).
    pub green: Channel,
    /// The blue channel value (0-255).
    pub blue: Channel,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::gray(0);
    pub const WHITE: Pixel = Pixel::gray(255);

    pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
        Pixel { red, green, blue }
    }

    /// A pixel with all three channels set to `value`.
    pub const fn gray(value: Channel) -> Self {
        Pixel::new(value, value, value)
    }

    /// Luminance estimate (Rec. 601 luma), untruncated.
    ///
    /// Never exceeds 255.0 because the weights sum to one.
    pub fn luminance(&self) -> Luminance {
        RED_WEIGHT * self.red as Luminance
            + GREEN_WEIGHT * self.green as Luminance
            + BLUE_WEIGHT * self.blue as Luminance
    }

    pub fn is_gray(&self) -> bool {
        self.red == self.green && self.green == self.blue
    }

    pub fn channels(&self) -> [Channel; CHANNELS] {
        [self.red, self.green, self.blue]
    }
}

impl From<Pixel> for [Byte; CHANNELS] {
    fn from(pixel: Pixel) -> Self {
        pixel.channels()
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:>3},{:>3},{:>3})", self.red, self.green, self.blue)
    }
}
