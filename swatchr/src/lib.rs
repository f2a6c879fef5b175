//! Extract a representative color palette from an image by performing k-means
//! clustering in RGB space, and render the palette as a swatch strip image.
//!
//! # Examples
//!
//! ## Extract 8 colors from an image file and print their hexcodes.
//!
//! ```no_run
//! # fn main() -> swatchr::Result<()> {
//! let palette = swatchr::extract_colors("some image", swatchr::DEFAULT_K, swatchr::DEFAULT_SEED)?;
//! for hex in palette.hex_colors() {
//!     println!("{hex}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Reuse the samples to try different cluster counts.
//!
//! ```no_run
//! # fn main() -> swatchr::Result<()> {
//! let samples = swatchr::sampler::sample_path("some image")?;
//!
//! let small = swatchr::extract_from_samples(&samples, 4, swatchr::DEFAULT_SEED)?;
//! let large = swatchr::extract_from_samples(&samples, 12, swatchr::DEFAULT_SEED)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Write the palette out as a 400x50 swatch strip.
//!
//! ```no_run
//! # fn main() -> swatchr::Result<()> {
//! let palette = swatchr::extract_colors("some image", 8, 42)?;
//! swatchr::render_palette(&palette.colors, "palette.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Determinism
//!
//! Extraction is a pure function of the image, the cluster count, and the
//! seed. The same three inputs always produce a bit-identical palette, which
//! is why the seed is an explicit parameter instead of ambient state.
//!
//! # Concurrency
//!
//! Each extraction is independent and shares no state with concurrent
//! extractions. The one shared mutable resource is the swatch output path:
//! callers that render concurrently must supply a distinct path per
//! invocation, or serialize access themselves.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unreadable_literal)]

use palette::Srgb;
use std::path::Path;

mod error;
pub mod kmeans;
pub mod render;
pub mod sampler;

pub use error::{PaletteError, Result};
pub use kmeans::KmeansResult;
pub use render::render_palette;

/// Default number of palette colors to extract
pub const DEFAULT_K: u8 = 8;

/// Default seed for the clustering random number generator
pub const DEFAULT_SEED: u64 = 42;

/// An ordered color palette extracted from an image
///
/// The ordering follows the cluster output order and is stable for a fixed
/// input image and seed.
#[derive(Debug, Clone)]
pub struct Palette {
	/// Representative colors in cluster output order
	pub colors: Vec<Srgb<u8>>,
	/// Number of analyzed pixels averaged into each color
	pub counts: Vec<u32>,
	/// Number of k-means iterations that produced the palette
	pub iterations: u32,
}

impl Palette {
	/// The number of colors in the palette
	#[must_use]
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Whether the palette holds no colors
	///
	/// Extraction never produces an empty palette; this exists for
	/// completeness alongside [`Palette::len`].
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Canonical lowercase `#rrggbb` strings, one per color, in palette order
	#[must_use]
	pub fn hex_colors(&self) -> Vec<String> {
		self.colors.iter().map(|color| format!("#{color:x}")).collect()
	}
}

/// Extract `k` representative colors from the image at `path`
///
/// # Errors
///
/// Returns [`PaletteError::UnreadableImage`] or
/// [`PaletteError::UnsupportedFormat`] if the image cannot be decoded, and
/// [`PaletteError::InvalidClusterCount`] if `k` is zero or exceeds the
/// number of analyzed pixels.
pub fn extract_colors(path: impl AsRef<Path>, k: u8, seed: u64) -> Result<Palette> {
	extract_from_samples(&sampler::sample_path(path)?, k, seed)
}

/// Extract `k` representative colors from an in-memory encoded image
///
/// # Errors
///
/// Same cases as [`extract_colors`].
pub fn extract_colors_from_bytes(bytes: &[u8], k: u8, seed: u64) -> Result<Palette> {
	extract_from_samples(&sampler::sample_bytes(bytes)?, k, seed)
}

/// Extract `k` representative colors from already sampled pixels
///
/// Decoding and sampling an image is the expensive part of extraction, so
/// use this entry point to run clustering multiple times over the same
/// samples with different `k` or seed values.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidClusterCount`] if `k` is zero or exceeds
/// `samples.len()`.
pub fn extract_from_samples(samples: &[Srgb<u8>], k: u8, seed: u64) -> Result<Palette> {
	let result = kmeans::run(samples, k, seed, kmeans::DEFAULT_CONVERGENCE, kmeans::DEFAULT_MAX_ITER)?;
	Ok(Palette {
		colors: result.centroids,
		counts: result.counts,
		iterations: result.iterations,
	})
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;

	#[test]
	fn hex_colors_are_lowercase_and_ordered() {
		let palette = Palette {
			colors: vec![Srgb::new(255, 171, 64), Srgb::new(0, 0, 0)],
			counts: vec![3, 1],
			iterations: 1,
		};

		assert_eq!(palette.hex_colors(), ["#ffab40", "#000000"]);
	}

	#[test]
	fn palette_length_matches_the_color_count() {
		let palette = Palette {
			colors: vec![Srgb::new(1, 2, 3)],
			counts: vec![10],
			iterations: 2,
		};

		assert_eq!(palette.len(), 1);
		assert!(!palette.is_empty());
	}
}
