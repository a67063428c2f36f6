use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tilelev::{RasterTile, QUADRANT_MIDPOINTS};

#[derive(Serialize)]
struct QuadrantSample {
    x: u32,
    y: u32,
    rgb: [u8; 3],
    elevation: f64,
}

#[derive(Serialize)]
struct SampleReport {
    tile: String,
    samples: Vec<QuadrantSample>,
    mean_elevation: f64,
}

pub fn run(tile: PathBuf, json: bool) -> Result<()> {
    let report = sample_tile(&tile)?;

    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("Tile: {}", report.tile);
        println!();
        for sample in &report.samples {
            println!(
                "({:>3}, {:>3})  rgb({:>3}, {:>3}, {:>3})  {:>10.1}m",
                sample.x,
                sample.y,
                sample.rgb[0],
                sample.rgb[1],
                sample.rgb[2],
                sample.elevation
            );
        }
        println!();
        println!("Mean elevation: {:.1}m", report.mean_elevation);
    }

    Ok(())
}

fn sample_tile(tile: &Path) -> Result<SampleReport> {
    let bytes = std::fs::read(tile)
        .with_context(|| format!("Failed to read tile {}", tile.display()))?;
    let raster = RasterTile::from_png(&bytes).context("Failed to decode tile")?;

    let samples = QUADRANT_MIDPOINTS
        .iter()
        .zip(raster.sample_quadrants())
        .zip(raster.quadrant_elevations())
        .map(|((&(x, y), rgb), elevation)| QuadrantSample {
            x,
            y,
            rgb,
            elevation,
        })
        .collect();

    Ok(SampleReport {
        tile: tile.display().to_string(),
        samples,
        mean_elevation: raster.mean_elevation(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;
    use tilelev::encoding::elevation_to_rgb;

    #[test]
    fn test_sample_report() {
        let tmp = TempDir::new().unwrap();
        let mut image = RgbImage::new(256, 256);
        for (&(x, y), meters) in QUADRANT_MIDPOINTS.iter().zip([100.0, 200.0, 300.0, 400.0]) {
            image.put_pixel(x, y, Rgb(elevation_to_rgb(meters).unwrap()));
        }
        let path = tmp.path().join("tile.png");
        std::fs::write(&path, RasterTile::from_image(image).unwrap().to_png().unwrap()).unwrap();

        let report = sample_tile(&path).unwrap();
        assert_eq!(report.samples.len(), 4);
        assert_eq!((report.samples[1].x, report.samples[1].y), (192, 64));
        assert!((report.samples[3].elevation - 400.0).abs() < 1e-6);
        assert!((report.mean_elevation - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(sample_tile(&tmp.path().join("nope.png")).is_err());
    }
}
