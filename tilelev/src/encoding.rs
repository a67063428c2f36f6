//! Terrain-RGB colour encoding.
//!
//! Terrain-RGB tiles store elevation in the three 8-bit colour channels of
//! each pixel. The channels form a 24-bit big-endian integer counting
//! decimeters above -10000 m:
//!
//! ```text
//! elevation = -10000 + (R * 256 * 256 + G * 256 + B) * 0.1
//! ```
//!
//! The lowest representable value is -10000.0 m (black) and the highest
//! is 1667721.5 m (white).

/// Elevation in meters encoded by `(0, 0, 0)`.
pub const BASE_ELEVATION: f64 = -10000.0;

/// Meters per unit of the combined 24-bit channel value.
pub const ELEVATION_STEP: f64 = 0.1;

/// Largest combined channel value (`0xFFFFFF`).
const MAX_CODE: u32 = 0x00FF_FFFF;

/// Decode one terrain-RGB pixel to an elevation in meters.
///
/// Channels are taken on the 8-bit scale; wider samples must be scaled down
/// before they reach this function.
///
/// # Examples
///
/// ```
/// use tilelev::encoding::rgb_to_elevation;
///
/// assert_eq!(rgb_to_elevation(0, 0, 0), -10000.0);
/// assert_eq!(rgb_to_elevation(1, 134, 160), 0.0);
/// ```
pub fn rgb_to_elevation(r: u8, g: u8, b: u8) -> f64 {
    let code = (r as u32) << 16 | (g as u32) << 8 | b as u32;
    BASE_ELEVATION + code as f64 * ELEVATION_STEP
}

/// Encode an elevation in meters as a terrain-RGB pixel.
///
/// The value is rounded to the nearest 0.1 m step. Returns `None` when the
/// elevation falls outside the representable range.
///
/// # Examples
///
/// ```
/// use tilelev::encoding::elevation_to_rgb;
///
/// assert_eq!(elevation_to_rgb(0.0), Some([1, 134, 160]));
/// assert_eq!(elevation_to_rgb(-20000.0), None);
/// ```
pub fn elevation_to_rgb(meters: f64) -> Option<[u8; 3]> {
    if !meters.is_finite() {
        return None;
    }
    let code = ((meters - BASE_ELEVATION) / ELEVATION_STEP).round();
    if !(0.0..=MAX_CODE as f64).contains(&code) {
        return None;
    }
    let code = code as u32;
    Some([(code >> 16) as u8, (code >> 8) as u8, code as u8])
}

/// Unweighted arithmetic mean of four samples.
///
/// Summed pairwise so that four equal samples average to exactly that value.
pub fn mean4([a, b, c, d]: [f64; 4]) -> f64 {
    ((a + b) + (c + d)) / 4.0
}
