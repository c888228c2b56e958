// THEORY:
// `pixmorph_viewer` holds the concrete display surfaces for the `pixmorph` engine and
// the command-line front end built on them. The engine only knows the
// `DisplaySurface` trait; everything that touches a terminal or the filesystem for
// output lives here.

pub mod png_sequence;
pub mod terminal;

pub use png_sequence::{FrameRecord, MANIFEST_FILE, MAX_FRAME_BYTES, PngSequence};
pub use terminal::TerminalSurface;
