// THEORY:
// Reader and writer for the plain-text pixel map (`P3`) format:
//
//     P3
//     # optional comments run to the end of a line
//     <width> <height>
//     <max channel value>
//     r g b  r g b  ...   (width * height triplets, row-major from the top-left)
//
// Tokens are separated by any whitespace, so the triplets may be wrapped however the
// producer likes. The max channel value must be in 1..=255 and is otherwise ignored;
// channels are stored as-is without rescaling. Tokens after the last triplet are
// ignored.

use crate::core_modules::grid::{Dimensions, PixelGrid};
use crate::core_modules::pixel::{Channel, Pixel};
use std::fmt::Write as _;
use std::fs;
use std::num::ParseIntError;
use std::path::Path;
use thiserror::Error;

const MAGIC: &str = "P3";
const MAX_CHANNEL: u32 = Channel::MAX as u32;

#[derive(Debug, Error)]
pub enum PpmError {
    #[error("failed to read or write pixel map: {0}")]
    Io(#[from] std::io::Error),

    #[error("expected format tag `P3`, found `{0}`")]
    BadMagic(String),

    #[error("pixel map ended while reading the {0}")]
    UnexpectedEnd(&'static str),

    #[error("invalid {field} `{token}`: {source}")]
    BadNumber {
        field: &'static str,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("image size must be at least 1x1, got {0}")]
    BadDimensions(Dimensions),

    #[error("max channel value must be in 1..=255, got {0}")]
    BadMaxValue(u32),

    #[error("channel value {value} at pixel {index} exceeds 255")]
    ChannelOutOfRange { index: usize, value: u32 },

    #[error("expected {expected} pixels, found only {found}")]
    Truncated { expected: usize, found: usize },
}

/// Whitespace tokenizer that skips `#` comments.
struct Tokens<'a> {
    lines: std::str::Lines<'a>,
    current: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            current: "".split_whitespace(),
        }
    }

    fn number(&mut self, field: &'static str) -> Result<u32, PpmError> {
        let token = self.next().ok_or(PpmError::UnexpectedEnd(field))?;
        token.parse().map_err(|source| PpmError::BadNumber {
            field,
            token: token.to_owned(),
            source,
        })
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.current.next() {
                return Some(token);
            }
            let line = self.lines.next()?;
            let content = line.split_once('#').map_or(line, |(before, _)| before);
            self.current = content.split_whitespace();
        }
    }
}

/// Parses a `P3` pixel map held in memory.
pub fn parse_ppm(text: &str) -> Result<PixelGrid, PpmError> {
    let mut tokens = Tokens::new(text);

    let magic = tokens.next().ok_or(PpmError::UnexpectedEnd("format tag"))?;
    if magic != MAGIC {
        return Err(PpmError::BadMagic(magic.to_owned()));
    }

    let width = tokens.number("width")? as usize;
    let height = tokens.number("height")? as usize;
    let dimensions = Dimensions::new(width, height);
    if dimensions.validate().is_err() {
        return Err(PpmError::BadDimensions(dimensions));
    }

    let max_value = tokens.number("max channel value")?;
    if !(1..=MAX_CHANNEL).contains(&max_value) {
        return Err(PpmError::BadMaxValue(max_value));
    }

    let expected = width
        .checked_mul(height)
        .ok_or(PpmError::BadDimensions(dimensions))?;
    // Capacity follows the input length, never the header alone.
    let mut pixels = Vec::with_capacity(expected.min(text.len() / 6));
    for index in 0..expected {
        let mut channel = |field| -> Result<Channel, PpmError> {
            let value = match tokens.number(field) {
                Err(PpmError::UnexpectedEnd(_)) => {
                    return Err(PpmError::Truncated {
                        expected,
                        found: index,
                    });
                }
                other => other?,
            };
            Channel::try_from(value).map_err(|_| PpmError::ChannelOutOfRange { index, value })
        };
        let red = channel("red channel")?;
        let green = channel("green channel")?;
        let blue = channel("blue channel")?;
        pixels.push(Pixel::new(red, green, blue));
    }

    PixelGrid::new(width, height, pixels).map_err(|_| PpmError::BadDimensions(dimensions))
}

/// Reads a `P3` pixel map from disk.
pub fn read_ppm(path: impl AsRef<Path>) -> Result<PixelGrid, PpmError> {
    let text = fs::read_to_string(path)?;
    parse_ppm(&text)
}

/// Serializes a grid as `P3`, one image row per line.
pub fn to_ppm_string(grid: &PixelGrid) -> String {
    let mut out = String::with_capacity(16 + grid.pixels().len() * 12);
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{MAGIC}");
    let _ = writeln!(out, "{} {}", grid.width(), grid.height());
    let _ = writeln!(out, "{MAX_CHANNEL}");
    for row in grid.rows() {
        let line = row
            .iter()
            .map(|p| format!("{} {} {}", p.red, p.green, p.blue))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Writes a grid to disk as `P3`.
pub fn write_ppm(path: impl AsRef<Path>, grid: &PixelGrid) -> Result<(), PpmError> {
    fs::write(path, to_ppm_string(grid))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: &str = "P3\n# two by two\n2 2\n255\n255 0 0  0 255 0\n0 0 255  255 255 255\n";

    #[test]
    fn parses_row_major_triplets() {
        let grid = parse_ppm(TINY).unwrap();
        assert_eq!(grid.dimensions(), Dimensions::new(2, 2));
        assert_eq!(grid[(0, 0)], Pixel::new(255, 0, 0));
        assert_eq!(grid[(0, 1)], Pixel::new(0, 255, 0));
        assert_eq!(grid[(1, 0)], Pixel::new(0, 0, 255));
        assert_eq!(grid[(1, 1)], Pixel::WHITE);
    }

    #[test]
    fn triplets_may_wrap_across_lines() {
        let text = "P3 3 1 255\n1 2\n3 4 5 6 7\n8 9 # trailing comment\n";
        let grid = parse_ppm(text).unwrap();
        assert_eq!(
            grid.pixels(),
            &[Pixel::new(1, 2, 3), Pixel::new(4, 5, 6), Pixel::new(7, 8, 9)]
        );
    }

    #[test]
    fn rejects_other_formats() {
        assert!(matches!(parse_ppm("P6\n1 1\n255\n"), Err(PpmError::BadMagic(tag)) if tag == "P6"));
        assert!(matches!(parse_ppm(""), Err(PpmError::UnexpectedEnd(_))));
    }

    #[test]
    fn rejects_bad_header_values() {
        assert!(matches!(
            parse_ppm("P3\n0 2\n255\n"),
            Err(PpmError::BadDimensions(_))
        ));
        assert!(matches!(
            parse_ppm("P3\n1 1\n65535\n0 0 0\n"),
            Err(PpmError::BadMaxValue(65535))
        ));
        assert!(matches!(
            parse_ppm("P3\nwide 1\n255\n"),
            Err(PpmError::BadNumber { field: "width", .. })
        ));
    }

    #[test]
    fn reports_truncated_pixel_data() {
        let result = parse_ppm("P3\n2 2\n255\n1 2 3  4 5 6  7 8\n");
        assert!(matches!(
            result,
            Err(PpmError::Truncated {
                expected: 4,
                found: 2
            })
        ));
    }

    #[test]
    fn oversized_header_without_data_is_truncated() {
        let result = parse_ppm("P3\n4294967295 4294967295\n255\n1 2 3\n");
        assert!(matches!(
            result,
            Err(PpmError::Truncated { found: 1, .. })
        ));
    }

    #[test]
    fn rejects_channels_above_255() {
        let result = parse_ppm("P3\n1 1\n255\n0 256 0\n");
        assert!(matches!(
            result,
            Err(PpmError::ChannelOutOfRange {
                index: 0,
                value: 256
            })
        ));
    }

    #[test]
    fn written_text_parses_back() {
        let grid = parse_ppm(TINY).unwrap();
        let text = to_ppm_string(&grid);
        assert!(text.starts_with("P3\n2 2\n255\n"));
        assert_eq!(parse_ppm(&text).unwrap(), grid);
    }

    #[test]
    fn reads_and_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.ppm");
        let grid = parse_ppm(TINY).unwrap();
        write_ppm(&path, &grid).unwrap();
        assert_eq!(read_ppm(&path).unwrap(), grid);
        assert!(matches!(
            read_ppm(dir.path().join("missing.ppm")),
            Err(PpmError::Io(_))
        ));
    }
}
