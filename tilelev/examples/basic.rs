//! Basic example demonstrating tilelev library usage.
//!
//! Builds a synthetic route of uniform terrain-RGB tiles, decodes it and
//! prints the resulting profile.
//!
//! Run with: cargo run --example basic

use tilelev::encoding::elevation_to_rgb;
use tilelev::{
    CancelToken, DecodeError, EncodedElevationData, LatLon, RasterTile, TileCoordinate,
    TileElevationDecoder,
};

fn main() -> Result<(), DecodeError> {
    // Interlaken to the Jungfraujoch
    let stops = [
        ("Interlaken Ost", 46.6904, 7.8692, 567.0),
        ("Lauterbrunnen", 46.5988, 7.9081, 796.0),
        ("Kleine Scheidegg", 46.5853, 7.9613, 2061.0),
        ("Eigergletscher", 46.5749, 7.9716, 2320.0),
        ("Jungfraujoch", 46.5473, 7.9827, 3454.0),
    ];

    let mut data = EncodedElevationData::new();
    for (sequence, (_, lat, lon, meters)) in stops.iter().enumerate() {
        let rgb = elevation_to_rgb(*meters).expect("elevation in terrain-RGB range");
        let png = RasterTile::uniform(rgb).to_png()?;
        data.insert(
            TileCoordinate::new(sequence as u32, LatLon::new(*lat, *lon)),
            png,
        );
    }

    let decoder = TileElevationDecoder::new();
    let route = decoder.decode(&data, &CancelToken::new())?;

    println!("Route profile:");
    println!("{:-<50}", "");
    for ((name, ..), elevation) in stops.iter().zip(&route) {
        println!("{:<20} {:>8.1}m", name, elevation.meters());
    }

    println!("\nSummary:");
    println!("  Lowest:  {:.1}m", route.min_meters().unwrap_or_default());
    println!("  Highest: {:.1}m", route.max_meters().unwrap_or_default());
    println!("  Ascent:  {:.1}m", route.total_ascent());
    println!("  Descent: {:.1}m", route.total_descent());

    Ok(())
}
