//! Loads an image and flattens it into a bounded sequence of RGB samples

use crate::error::{PaletteError, Result};
use image::{imageops::FilterType, DynamicImage};
use palette::Srgb;
use std::path::Path;

/// Width of the fixed analysis resolution
pub const ANALYSIS_WIDTH: u32 = 200;

/// Height of the fixed analysis resolution
pub const ANALYSIS_HEIGHT: u32 = 200;

/// Map a decode failure into the error taxonomy
fn decode_error(error: image::ImageError) -> PaletteError {
	match error {
		e @ image::ImageError::Unsupported(_) => PaletteError::UnsupportedFormat(e),
		e => PaletteError::UnreadableImage(e),
	}
}

/// Decode the image at `path` and produce its pixel samples
pub fn sample_path(path: impl AsRef<Path>) -> Result<Vec<Srgb<u8>>> {
	let image = image::open(path).map_err(decode_error)?;
	Ok(sample_image(&image))
}

/// Decode an in-memory encoded image and produce its pixel samples
pub fn sample_bytes(bytes: &[u8]) -> Result<Vec<Srgb<u8>>> {
	let image = image::load_from_memory(bytes).map_err(decode_error)?;
	Ok(sample_image(&image))
}

/// Resize a decoded image to the analysis resolution and flatten it into
/// row-major RGB samples
///
/// The resize ignores the source aspect ratio: the point is to bound the
/// clustering cost, and the extracted colors describe the resized image.
/// Nearest-neighbor filtering keeps every sample an exact color of the
/// source instead of an interpolated blend. Any alpha channel is dropped.
#[must_use]
pub fn sample_image(image: &DynamicImage) -> Vec<Srgb<u8>> {
	let pixels = image
		.resize_exact(ANALYSIS_WIDTH, ANALYSIS_HEIGHT, FilterType::Nearest)
		.into_rgb8();
	let samples: &[Srgb<u8>] = palette::cast::from_component_slice(pixels.as_raw());
	samples.to_vec()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use image::{Rgba, RgbaImage};

	#[test]
	fn sample_count_is_fixed_by_the_analysis_resolution() {
		let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(13, 7, Rgba([1, 2, 3, 255])));
		let samples = sample_image(&image);
		assert_eq!(samples.len(), (ANALYSIS_WIDTH * ANALYSIS_HEIGHT) as usize);
	}

	#[test]
	fn alpha_channel_is_dropped() {
		let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0])));
		let samples = sample_image(&image);
		assert!(samples.iter().all(|&color| color == Srgb::new(10, 20, 30)));
	}

	#[test]
	fn unknown_bytes_are_an_unsupported_format() {
		let result = sample_bytes(b"not an image at all");
		assert!(matches!(result, Err(PaletteError::UnsupportedFormat(_))));
	}

	#[test]
	fn corrupt_png_is_unreadable() {
		// A valid PNG signature followed by garbage
		let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
		bytes.extend_from_slice(&[0xAB; 32]);
		let result = sample_bytes(&bytes);
		assert!(matches!(result, Err(PaletteError::UnreadableImage(_))));
	}
}
