use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pixmorph::Dimensions;

#[derive(Parser, Debug)]
#[command(
    name = "pixmorph",
    author,
    version,
    about = "Morph a pixel map into another image, one blended frame at a time",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct Cli {
    #[command(flatten)]
    pub morph: MorphArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug)]
pub struct MorphArgs {
    /// Plain-text (P3) pixel map to start from.
    #[arg(value_name = "IMAGE", required = true)]
    pub image: Option<PathBuf>,

    /// Number of blend steps; the animation shows STEPS + 1 frames.
    #[arg(value_name = "STEPS", required = true)]
    pub steps: Option<u32>,

    /// Morph into this pixel map instead of the grayscale version of IMAGE.
    #[arg(long, value_name = "FILE")]
    pub target: Option<PathBuf>,

    /// Pause between frames, in milliseconds.
    #[arg(
        long,
        value_name = "MS",
        env = "PIXMORPH_FRAME_DELAY_MS",
        default_value_t = 500
    )]
    pub delay_ms: u64,

    /// Write frames as PNG files into DIR instead of drawing them in the terminal.
    #[arg(long, value_name = "DIR")]
    pub frames_dir: Option<PathBuf>,

    /// Edge length of the square drawn for each image pixel in PNG output.
    #[arg(
        long,
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub cell_size: u32,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a single transform to a pixel map and write the result.
    Transform(TransformArgs),
    /// Print every pixel of a pixel map as (r,g,b) triplets.
    Print(PrintArgs),
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Pixel map to read.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the transformed pixel map.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// `grayscale`, `flip-horizontal`, `flip-vertical` or `scale:WIDTHxHEIGHT`.
    #[arg(value_name = "OP", value_parser = parse_operation)]
    pub operation: Operation,
}

#[derive(Args, Debug)]
pub struct PrintArgs {
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Grayscale,
    FlipHorizontal,
    FlipVertical,
    Scale(Dimensions),
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_operation(value: &str) -> Result<Operation, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("operation must not be empty".into());
    }

    let (op, rest) = match trimmed.split_once([':', '=']) {
        Some((op, rest)) => (op.trim().to_ascii_lowercase(), Some(rest.trim())),
        None => (trimmed.to_ascii_lowercase(), None),
    };

    match op.as_str() {
        "grayscale" | "greyscale" | "gray" => Ok(Operation::Grayscale),
        "flip-horizontal" | "fliph" => Ok(Operation::FlipHorizontal),
        "flip-vertical" | "flipv" => Ok(Operation::FlipVertical),
        "scale" => {
            let Some(rest) = rest else {
                return Err("scale requires dimensions (e.g. scale:64x48)".into());
            };
            parse_dimensions(rest).map(Operation::Scale)
        }
        other => Err(format!(
            "unknown operation '{other}'; expected grayscale, flip-horizontal, flip-vertical, or scale:WxH"
        )),
    }
}

fn parse_dimensions(value: &str) -> Result<Dimensions, String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<usize>()
        .map_err(|_| "invalid width in scale dimensions".to_string())?;
    let height = h
        .trim()
        .parse::<usize>()
        .map_err(|_| "invalid height in scale dimensions".to_string())?;
    if width == 0 || height == 0 {
        return Err("scale dimensions must be greater than zero".into());
    }
    Ok(Dimensions::new(width, height))
}
