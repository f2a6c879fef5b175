//! The error taxonomy shared by the sampling, clustering, and rendering stages

use thiserror::Error;

/// Result type alias for palette extraction and rendering operations
pub type Result<T> = std::result::Result<T, PaletteError>;

/// Failures surfaced by the extraction and rendering pipeline
///
/// Every variant is terminal for the current invocation: nothing is retried
/// internally, and no partial palette is ever returned in place of an error.
#[derive(Debug, Error)]
pub enum PaletteError {
	/// The image source could not be decoded
	#[error("failed to decode the image: {0}")]
	UnreadableImage(#[source] image::ImageError),

	/// The image format is not recognized or cannot be converted to 8-bit RGB
	#[error("unsupported image format: {0}")]
	UnsupportedFormat(#[source] image::ImageError),

	/// The requested cluster count is outside `1..=samples`
	#[error("invalid cluster count: k = {k} with {samples} samples")]
	InvalidClusterCount {
		/// The requested number of clusters
		k: u8,
		/// The number of pixel samples available for clustering
		samples: usize,
	},

	/// The swatch image could not be encoded or written to the output path
	#[error("failed to write the swatch image: {0}")]
	RenderWrite(#[source] image::ImageError),
}
