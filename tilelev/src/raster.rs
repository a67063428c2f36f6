//! Terrain-RGB raster tile parsing and quadrant sampling.
//!
//! This module provides the [`RasterTile`] struct for decoding a 256×256 PNG
//! tile and estimating its elevation from four fixed pixel locations.
//!
//! # Sampling
//!
//! Rather than projecting every point of the route onto a pixel, a tile's
//! elevation is approximated by the mean of the pixels at the middle of each
//! quadrant:
//!
//! ```text
//!   0        128       256
//! 0 +---------+---------+
//!   |         |         |
//!   | (64,64) |(192,64) |
//!   |         |         |
//! 128+--------+---------+
//!   |         |         |
//!   |(64,192) |(192,192)|
//!   |         |         |
//! 256+--------+---------+
//! ```

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};

use crate::encoding::{mean4, rgb_to_elevation};
use crate::error::{DecodeError, Result};

/// Width and height of a raster tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Pixel locations `(x, y)` sampled from each tile: top-left, top-right,
/// bottom-left and bottom-right quadrant midpoints.
pub const QUADRANT_MIDPOINTS: [(u32, u32); 4] = [
    (TILE_SIZE / 4, TILE_SIZE / 4),
    (TILE_SIZE * 3 / 4, TILE_SIZE / 4),
    (TILE_SIZE / 4, TILE_SIZE * 3 / 4),
    (TILE_SIZE * 3 / 4, TILE_SIZE * 3 / 4),
];

/// A decoded 256×256 terrain-RGB tile with 8-bit channels.
///
/// # Example
///
/// ```ignore
/// use tilelev::RasterTile;
///
/// let tile = RasterTile::from_png(&png_bytes)?;
/// println!("Tile elevation: {:.1}m", tile.mean_elevation());
/// ```
#[derive(Debug, Clone)]
pub struct RasterTile {
    pixels: RgbImage,
}

impl RasterTile {
    /// Decode a tile from PNG bytes.
    ///
    /// Any PNG colour type is accepted. Channels wider than 8 bits are
    /// scaled down to the 8-bit range and alpha is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedRaster`] if the bytes are not a PNG
    /// image or the image is not 256×256. The error carries sequence `0`;
    /// callers that know the tile should re-tag it.
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|e| {
            DecodeError::MalformedRaster {
                sequence: 0,
                reason: e.to_string(),
            }
        })?;
        Self::from_dynamic(image)
    }

    /// Wrap an already decoded image.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedRaster`] if the image is not 256×256.
    pub fn from_image(pixels: RgbImage) -> Result<Self> {
        check_dimensions(pixels.width(), pixels.height())?;
        Ok(Self { pixels })
    }

    /// Build a tile where every pixel has the same colour.
    pub fn uniform(rgb: [u8; 3]) -> Self {
        Self {
            pixels: RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, image::Rgb(rgb)),
        }
    }

    fn from_dynamic(image: DynamicImage) -> Result<Self> {
        check_dimensions(image.width(), image.height())?;
        Ok(Self {
            pixels: image.to_rgb8(),
        })
    }

    /// Encode the tile back to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Encode`] if the PNG encoder fails.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(DecodeError::Encode)?;
        Ok(buf.into_inner())
    }

    /// Get the 8-bit RGB value at a pixel, or `None` outside the tile.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Read the four quadrant midpoint pixels, in [`QUADRANT_MIDPOINTS`] order.
    pub fn sample_quadrants(&self) -> [[u8; 3]; 4] {
        QUADRANT_MIDPOINTS.map(|(x, y)| self.pixels.get_pixel(x, y).0)
    }

    /// Decoded elevation of each quadrant sample in meters.
    pub fn quadrant_elevations(&self) -> [f64; 4] {
        self.sample_quadrants().map(|[r, g, b]| rgb_to_elevation(r, g, b))
    }

    /// Estimated tile elevation: the mean of the four quadrant samples.
    pub fn mean_elevation(&self) -> f64 {
        mean4(self.quadrant_elevations())
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width != TILE_SIZE || height != TILE_SIZE {
        return Err(DecodeError::MalformedRaster {
            sequence: 0,
            reason: format!(
                "unexpected dimensions {width}x{height} (expected {TILE_SIZE}x{TILE_SIZE})"
            ),
        });
    }
    Ok(())
}
