//! # tilelev - Route Elevation from Terrain-RGB Tiles
//!
//! Turns raster elevation tiles into a sequence of point elevation estimates
//! for a route.
//!
//! ## Features
//!
//! - **Fast**: each tile is estimated from four pixels, not rasterized
//! - **Parallel**: tiles are decoded concurrently on a rayon pool
//! - **All-or-nothing**: one bad tile or a cancellation fails the whole call
//! - **Ordered**: output follows the tile sequence the caller assigned
//!
//! ## Quick Start
//!
//! ```ignore
//! use tilelev::{CancelToken, EncodedElevationData, LatLon, TileCoordinate, TileElevationDecoder};
//!
//! let mut data = EncodedElevationData::new();
//! data.insert(TileCoordinate::new(0, LatLon::new(46.55, 7.98)), first_png);
//! data.insert(TileCoordinate::new(1, LatLon::new(46.56, 7.99)), second_png);
//!
//! let decoder = TileElevationDecoder::new();
//! let route = decoder.decode(&data, &CancelToken::new())?;
//! assert_eq!(route.len(), 2);
//! ```
//!
//! ## Tile Format
//!
//! Each tile is a 256×256 PNG in terrain-RGB encoding:
//!
//! ```text
//! elevation = -10000 + (R * 256 * 256 + G * 256 + B) * 0.1
//! ```
//!
//! A tile's elevation is the mean of the pixels at the midpoints of its four
//! quadrants: (64,64), (192,64), (64,192) and (192,192).
//!
//! Fetching tiles and mapping coordinates to tile indices are left to the
//! caller.

pub mod cancel;
pub mod coord;
pub mod decoder;
pub mod elevation;
pub mod encoding;
pub mod error;
pub mod raster;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export main types at crate root for convenience
pub use cancel::CancelToken;
pub use coord::{EncodedElevationData, LatLon, TileCoordinate};
pub use decoder::{DecoderBuilder, TileElevationDecoder};
pub use elevation::{Elevation, RouteElevation};
pub use error::{DecodeError, Result};
pub use raster::{RasterTile, QUADRANT_MIDPOINTS, TILE_SIZE};
