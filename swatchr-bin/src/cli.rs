//! Specifies the CLI and handles arg parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Supported output formats for the extracted colors
#[derive(Copy, Clone, ValueEnum)]
pub enum FormatOutput {
    /// sRGB hexcode
    Hex,
    /// sRGB (r,g,b) triple
    Rgb,
    /// Whitespace with true color background
    Swatch,
}

/// Ways to colorize the output text
#[derive(Copy, Clone, ValueEnum)]
pub enum ColorizeOutput {
    /// Foreground
    Fg,
    /// Background
    Bg,
}

/// Extract a color palette from an image by performing k-means clustering in RGB space.
///
/// The palette is printed in cluster order and can additionally be written out
/// as a swatch strip image.
#[derive(Parser)]
#[command(version)]
pub struct Options {
    /// The path to the input image
    pub image: PathBuf,

    /// The number of colors to extract
    #[arg(short, default_value_t = swatchr::DEFAULT_K, value_parser = clap::value_parser!(u8).range(1..))]
    pub k: u8,

    /// The seed value used for the random number generator
    ///
    /// The same image, color count, and seed always produce the same palette.
    #[arg(long, default_value_t = swatchr::DEFAULT_SEED)]
    pub seed: u64,

    /// Write the palette as a 400x50 swatch strip image to this path
    ///
    /// An existing file at the path is overwritten. Concurrent runs must be
    /// given distinct paths.
    #[arg(short = 'o', long)]
    pub swatch: Option<PathBuf>,

    /// The format to print the colors in
    #[arg(long, default_value = "hex")]
    pub output: FormatOutput,

    /// Color the foreground or background for each printed color
    #[arg(short, long)]
    pub colorize: Option<ColorizeOutput>,

    /// Print additional information, such as the number of k-means iterations
    #[arg(long)]
    pub verbose: bool,
}
