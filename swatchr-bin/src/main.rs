//! Extract a color palette from an image by performing k-means clustering in RGB space.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

mod cli;

use cli::{ColorizeOutput, FormatOutput, Options};

use std::{process::ExitCode, time::Instant};

use clap::Parser;
use colored::Colorize;
use palette::Srgb;
use swatchr::{Palette, PaletteError};

/// Record the running time of a function and print the elapsed time
macro_rules! time {
    ($name: literal, $verbose: expr, $func_call: expr) => {{
        let start = Instant::now();
        let result = $func_call;
        if $verbose {
            println!("{} took {}ms", $name, start.elapsed().as_millis());
        }
        result
    }};
}

fn main() -> ExitCode {
    let options = Options::parse();

    let result = extract_and_print_palette(&options);

    // Returning Result<_> uses Debug printing instead of Display
    if let Err(e) = result {
        eprintln!("{e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Load an image, extract its palette, print it, and optionally write the swatch strip
fn extract_and_print_palette(options: &Options) -> Result<(), PaletteError> {
    let samples = time!(
        "Image sampling",
        options.verbose,
        swatchr::sampler::sample_path(&options.image)
    )?;

    let palette = time!(
        "Palette extraction",
        options.verbose,
        swatchr::extract_from_samples(&samples, options.k, options.seed)
    )?;

    if options.verbose {
        println!("k-means ran for {} iterations", palette.iterations);
    }

    print_palette(&palette, options);

    if let Some(path) = &options.swatch {
        time!(
            "Swatch rendering",
            options.verbose,
            swatchr::render_palette(&palette.colors, path)
        )?;
    }

    Ok(())
}

/// Print the palette colors based off the provided options
fn print_palette(palette: &Palette, options: &Options) {
    match options.output {
        FormatOutput::Hex => {
            color_format_print(palette, options, " ", |color| format!("#{color:x}"));
        }

        FormatOutput::Rgb => color_format_print(palette, options, " ", |color| {
            format!("({},{},{})", color.red, color.green, color.blue)
        }),

        FormatOutput::Swatch => print_colors(palette, "", |color| {
            "   "
                .on_truecolor(color.red, color.green, color.blue)
                .to_string()
        }),
    }
}

/// Print a line of colors using the given format
fn print_colors(palette: &Palette, delimiter: &str, format: impl Fn(Srgb<u8>) -> String) {
    println!(
        "{}",
        palette
            .colors
            .iter()
            .map(|&color| format(color))
            .collect::<Vec<_>>()
            .join(delimiter)
    );
}

/// Format, colorize, and then print the text for all colors
fn color_format_print(
    palette: &Palette,
    options: &Options,
    delimiter: &str,
    format: impl Fn(Srgb<u8>) -> String,
) {
    match options.colorize {
        Some(ColorizeOutput::Fg) => print_colors(palette, delimiter, |color| {
            format(color)
                .truecolor(color.red, color.green, color.blue)
                .to_string()
        }),

        Some(ColorizeOutput::Bg) => print_colors(palette, delimiter, |color| {
            format(color)
                .on_truecolor(color.red, color.green, color.blue)
                .to_string()
        }),

        None => print_colors(palette, delimiter, format),
    }
}
