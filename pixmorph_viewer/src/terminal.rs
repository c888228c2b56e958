// THEORY:
// A display surface that draws frames straight into an ANSI truecolor terminal.
//
// Each text cell shows two image rows using the upper-half-block glyph: the
// foreground color paints the top pixel and the background color the bottom one.
// An image with an odd number of rows leaves the background of the last text row at
// the terminal default.
//
// `configure` clears the screen and hides the cursor. `render` homes the cursor,
// writes the whole frame in one buffer and flushes, which is the "present" step.
// The cursor is restored by `close` or on drop.

use pixmorph::core_modules::display::check_frame;
use pixmorph::{Dimensions, DisplaySurface, Pixel, PixelGrid, SurfaceError};
use std::fmt::Write as _;
use std::io::{self, Write};
use tracing::{debug, warn};

const CURSOR_HIDE: &str = "\x1b[?25l";
const CURSOR_SHOW: &str = "\x1b[?25h";
const CURSOR_HOME: &str = "\x1b[H";
const CLEAR_SCREEN_AND_HOME: &str = "\x1b[2J\x1b[H";
const SGR_RESET_ALL: &str = "\x1b[0m";
const SGR_DEFAULT_BACKGROUND: &str = "\x1b[49m";
const UPPER_HALF_BLOCK: char = '\u{2580}';

pub struct TerminalSurface<W: Write> {
    out: W,
    configured: Option<Dimensions>,
    cursor_hidden: bool,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            configured: None,
            cursor_hidden: false,
        }
    }

    /// Resets colors and shows the cursor again.
    pub fn close(&mut self) -> io::Result<()> {
        if self.cursor_hidden {
            self.out.write_all(SGR_RESET_ALL.as_bytes())?;
            self.out.write_all(CURSOR_SHOW.as_bytes())?;
            self.out.flush()?;
            self.cursor_hidden = false;
        }
        Ok(())
    }

    fn encode(grid: &PixelGrid) -> String {
        // Roughly 40 bytes of escape codes per cell.
        let mut frame = String::with_capacity(CURSOR_HOME.len() + grid.pixels().len() * 40);
        frame.push_str(CURSOR_HOME);

        let rows: Vec<&[Pixel]> = grid.rows().collect();
        for pair in rows.chunks(2) {
            let top = pair[0];
            let bottom = pair.get(1).copied();
            for (col, upper) in top.iter().enumerate() {
                let _ = write!(frame, "\x1b[38;2;{};{};{}m", upper.red, upper.green, upper.blue);
                match bottom {
                    Some(bottom) => {
                        let lower = bottom[col];
                        let _ = write!(frame, "\x1b[48;2;{};{};{}m", lower.red, lower.green, lower.blue);
                    }
                    None => frame.push_str(SGR_DEFAULT_BACKGROUND),
                }
                frame.push(UPPER_HALF_BLOCK);
            }
            frame.push_str(SGR_RESET_ALL);
            frame.push_str("\r\n");
        }
        frame
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn configure(&mut self, dimensions: Dimensions) -> Result<(), SurfaceError> {
        self.out.write_all(CLEAR_SCREEN_AND_HOME.as_bytes())?;
        self.out.write_all(CURSOR_HIDE.as_bytes())?;
        self.out.flush()?;
        self.cursor_hidden = true;
        self.configured = Some(dimensions);
        debug!(%dimensions, "terminal surface configured");
        Ok(())
    }

    fn render(&mut self, grid: &PixelGrid) -> Result<(), SurfaceError> {
        check_frame(self.configured, grid)?;
        self.out.write_all(Self::encode(grid).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalSurface<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("failed to restore terminal cursor: {e}");
        }
    }
}
