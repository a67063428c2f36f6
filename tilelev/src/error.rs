//! Error types for the tilelev library.

use thiserror::Error;

/// Errors that can occur while decoding a set of elevation tiles.
///
/// Every variant is fatal for the whole decode call: no partial
/// [`RouteElevation`](crate::RouteElevation) is ever returned alongside one.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The bytes for a tile are not a valid 256×256 PNG image.
    #[error("Malformed raster for tile {sequence}: {reason}")]
    MalformedRaster { sequence: u32, reason: String },

    /// The caller's cancellation token fired before the decode completed.
    #[error("Decode cancelled")]
    Cancelled,

    /// A tile could not be encoded as PNG.
    #[error("Failed to encode PNG: {0}")]
    Encode(image::ImageError),

    /// The worker pool could not be created.
    #[error("Failed to build decoder thread pool: {0}")]
    ThreadPool(String),
}

impl DecodeError {
    /// Attach a tile sequence number to a [`DecodeError::MalformedRaster`].
    ///
    /// Other variants are returned unchanged.
    pub(crate) fn for_tile(self, sequence: u32) -> Self {
        match self {
            DecodeError::MalformedRaster { reason, .. } => {
                DecodeError::MalformedRaster { sequence, reason }
            }
            other => other,
        }
    }
}

/// Result type alias using [`DecodeError`].
pub type Result<T> = std::result::Result<T, DecodeError>;
