use anyhow::{Context, Result};
use std::path::PathBuf;
use tilelev::encoding::elevation_to_rgb;
use tilelev::RasterTile;

pub fn run(meters: f64, output: PathBuf) -> Result<()> {
    let rgb = elevation_to_rgb(meters)
        .with_context(|| format!("Elevation {}m cannot be encoded as terrain-RGB", meters))?;
    let png = RasterTile::uniform(rgb)
        .to_png()
        .context("Failed to encode tile")?;
    std::fs::write(&output, png)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} (rgb {}, {}, {})",
        output.display(),
        rgb[0],
        rgb[1],
        rgb[2]
    );
    Ok(())
}
