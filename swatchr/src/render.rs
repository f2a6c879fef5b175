//! Lays out palette colors as a swatch strip image

use crate::error::{PaletteError, Result};
use image::{Rgb, RgbImage};
use palette::Srgb;
use std::path::Path;

/// Width of the rendered swatch strip
pub const SWATCH_WIDTH: u32 = 400;

/// Height of the rendered swatch strip
pub const SWATCH_HEIGHT: u32 = 50;

/// Lay out the palette as contiguous solid vertical blocks, in palette order
/// from left to right
///
/// Each block takes `width / palette.len()` columns by integer division; the
/// last block extends to the right edge of the canvas, absorbing any
/// remainder columns, so the blocks always cover exactly `width` columns.
/// `palette` must be non-empty.
#[must_use]
pub fn render_swatch(palette: &[Srgb<u8>], width: u32, height: u32) -> RgbImage {
	debug_assert!(!palette.is_empty());

	// Palettes hold at most 255 colors
	#[allow(clippy::cast_possible_truncation)]
	let n = palette.len() as u32;
	let block = width / n;
	let mut image = RgbImage::new(width, height);

	for (i, color) in palette.iter().enumerate() {
		#[allow(clippy::cast_possible_truncation)]
		let i = i as u32;
		let start = i * block;
		let end = if i == n - 1 { width } else { start + block };
		for x in start..end {
			for y in 0..height {
				image.put_pixel(x, y, Rgb([color.red, color.green, color.blue]));
			}
		}
	}

	image
}

/// Render the palette at the default swatch size and write it to `path`
///
/// The destination is created or truncated, never appended to, so a
/// regeneration replaces the previous strip. Concurrent invocations must be
/// given distinct paths by the caller; the renderer does not serialize
/// access to a shared destination.
///
/// # Errors
///
/// Returns [`PaletteError::RenderWrite`] if the swatch image cannot be
/// encoded or the destination cannot be written.
pub fn render_palette(palette: &[Srgb<u8>], path: impl AsRef<Path>) -> Result<()> {
	render_swatch(palette, SWATCH_WIDTH, SWATCH_HEIGHT)
		.save(path)
		.map_err(PaletteError::RenderWrite)
}
