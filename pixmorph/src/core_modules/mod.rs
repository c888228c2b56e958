pub mod color;
pub mod compositor;
pub mod display;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod pixel;
pub mod ppm;
