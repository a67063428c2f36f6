use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tilelev::geojson::route_to_feature_collection;
use tilelev::{
    CancelToken, DecoderBuilder, EncodedElevationData, LatLon, RouteElevation, TileCoordinate,
};

/// Output format for decoded routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Geojson,
}

/// Column names in the manifest CSV.
pub struct ManifestColumns {
    pub sequence: String,
    pub lat: String,
    pub lon: String,
    pub path: String,
}

/// One tile listed in the manifest.
#[derive(Debug)]
struct ManifestEntry {
    coord: TileCoordinate,
    path: PathBuf,
}

#[derive(Serialize)]
struct ElevationRow {
    sequence: u32,
    lat: f64,
    lon: f64,
    elevation: f64,
}

pub fn run(
    threads: usize,
    cancel: CancelToken,
    manifest: PathBuf,
    columns: ManifestColumns,
    output: Option<PathBuf>,
    format: OutputFormat,
    summary: bool,
) -> Result<()> {
    let decoder = DecoderBuilder::new()
        .threads(threads)
        .build()
        .context("Failed to create decoder")?;

    let entries = read_manifest(&manifest, &columns)?;
    let data = load_tiles(&entries, &cancel)?;

    let route = decoder
        .decode(&data, &cancel)
        .context("Failed to decode tiles")?;

    let sequences: Vec<u32> = data.iter().map(|(coord, _)| coord.sequence).collect();

    match output {
        Some(path) => {
            let file = File::create(&path).context("Failed to create output file")?;
            let mut writer = BufWriter::new(file);
            write_route(&route, &sequences, format, &mut writer)?;
            writer.flush()?;
            eprintln!("Output written to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_route(&route, &sequences, format, &mut writer)?;
            writer.flush()?;
        }
    }

    if summary {
        print_summary(&route);
    }

    Ok(())
}

/// Parse the manifest, resolving tile paths relative to its directory.
fn read_manifest(manifest: &Path, columns: &ManifestColumns) -> Result<Vec<ManifestEntry>> {
    let file = File::open(manifest).context("Failed to open manifest")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));
    let base_dir = manifest.parent().unwrap_or_else(|| Path::new("."));

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("Column '{}' not found in manifest", name))
    };
    let seq_idx = column(&columns.sequence)?;
    let lat_idx = column(&columns.lat)?;
    let lon_idx = column(&columns.lon)?;
    let path_idx = column(&columns.path)?;

    let mut entries = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize, what: &str| {
            record
                .get(idx)
                .map(str::trim)
                .with_context(|| format!("Missing {} on row {}", what, line + 1))
        };

        let sequence: u32 = field(seq_idx, "sequence")?
            .parse()
            .with_context(|| format!("Invalid sequence on row {}", line + 1))?;
        let lat: f64 = field(lat_idx, "latitude")?
            .parse()
            .with_context(|| format!("Invalid latitude on row {}", line + 1))?;
        let lon: f64 = field(lon_idx, "longitude")?
            .parse()
            .with_context(|| format!("Invalid longitude on row {}", line + 1))?;
        let path = base_dir.join(field(path_idx, "path")?);

        entries.push(ManifestEntry {
            coord: TileCoordinate::new(sequence, LatLon::new(lat, lon)),
            path,
        });
    }

    if entries.is_empty() {
        bail!("Manifest lists no tiles: {}", manifest.display());
    }

    Ok(entries)
}

/// Read every tile into memory.
fn load_tiles(entries: &[ManifestEntry], cancel: &CancelToken) -> Result<EncodedElevationData> {
    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut data = EncodedElevationData::new();
    for entry in entries {
        if cancel.is_cancelled() {
            pb.abandon();
            bail!("Interrupted while reading tiles");
        }
        let png = fs::read(&entry.path)
            .with_context(|| format!("Failed to read tile {}", entry.path.display()))?;
        if data.insert(entry.coord, png).is_some() {
            tracing::warn!(
                sequence = entry.coord.sequence,
                path = %entry.path.display(),
                "duplicate sequence in manifest, keeping last tile"
            );
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(data)
}

fn write_route<W: Write>(
    route: &RouteElevation,
    sequences: &[u32],
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    let rows = route.iter().zip(sequences).map(|(elevation, &sequence)| {
        let from = elevation.from();
        ElevationRow {
            sequence,
            lat: from.lat,
            lon: from.lon,
            elevation: elevation.meters(),
        }
    });

    match format {
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for row in rows {
                csv_writer.serialize(row)?;
            }
            csv_writer.flush()?;
        }
        OutputFormat::Json => {
            let rows: Vec<ElevationRow> = rows.collect();
            serde_json::to_writer_pretty(&mut *writer, &rows)?;
            writeln!(writer)?;
        }
        OutputFormat::Geojson => {
            let geojson = geojson::GeoJson::from(route_to_feature_collection(route));
            serde_json::to_writer_pretty(&mut *writer, &geojson)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}

fn print_summary(route: &RouteElevation) {
    eprintln!("Tiles: {}", route.len());
    if let (Some(min), Some(max)) = (route.min_meters(), route.max_meters()) {
        eprintln!("Min elevation: {:.1}m", min);
        eprintln!("Max elevation: {:.1}m", max);
    }
    eprintln!("Total ascent: {:.1}m", route.total_ascent());
    eprintln!("Total descent: {:.1}m", route.total_descent());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tilelev::encoding::elevation_to_rgb;
    use tilelev::RasterTile;

    fn default_columns() -> ManifestColumns {
        ManifestColumns {
            sequence: "sequence".to_string(),
            lat: "lat".to_string(),
            lon: "lon".to_string(),
            path: "path".to_string(),
        }
    }

    fn write_tile(dir: &Path, name: &str, meters: f64) {
        let png = RasterTile::uniform(elevation_to_rgb(meters).unwrap())
            .to_png()
            .unwrap();
        fs::write(dir.join(name), png).unwrap();
    }

    fn write_manifest(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("route.csv");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_decode_to_csv() {
        let tmp = TempDir::new().unwrap();
        write_tile(tmp.path(), "a.png", 500.0);
        write_tile(tmp.path(), "b.png", 750.0);
        let manifest = write_manifest(
            tmp.path(),
            "sequence,lat,lon,path\n1,46.6,8.0,b.png\n0,46.5,7.9,a.png\n",
        );
        let out = tmp.path().join("out.csv");

        run(
            1,
            CancelToken::new(),
            manifest,
            default_columns(),
            Some(out.clone()),
            OutputFormat::Csv,
            false,
        )
        .unwrap();

        let mut reader = csv::Reader::from_path(&out).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[1][0], "1");
        let first: f64 = rows[0][3].parse().unwrap();
        let second: f64 = rows[1][3].parse().unwrap();
        assert!((first - 500.0).abs() < 1e-6);
        assert!((second - 750.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_to_geojson() {
        let tmp = TempDir::new().unwrap();
        write_tile(tmp.path(), "a.png", -25.0);
        let manifest = write_manifest(tmp.path(), "sequence,lat,lon,path\n0,31.5,35.5,a.png\n");
        let out = tmp.path().join("out.geojson");

        run(
            0,
            CancelToken::new(),
            manifest,
            default_columns(),
            Some(out.clone()),
            OutputFormat::Geojson,
            false,
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        let coords = &json["features"][0]["geometry"]["coordinates"];
        assert_eq!(coords[0], 35.5);
        assert_eq!(coords[1], 31.5);
        assert!((coords[2].as_f64().unwrap() + 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_custom_columns() {
        let tmp = TempDir::new().unwrap();
        write_tile(tmp.path(), "t.png", 10.0);
        let manifest = write_manifest(tmp.path(), "n,y,x,file\n3,1.0,2.0,t.png\n");
        let columns = ManifestColumns {
            sequence: "n".to_string(),
            lat: "y".to_string(),
            lon: "x".to_string(),
            path: "file".to_string(),
        };

        let entries = read_manifest(&manifest, &columns).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].coord.sequence, 3);
        assert_eq!(entries[0].coord.from, LatLon::new(1.0, 2.0));
        assert_eq!(entries[0].path, tmp.path().join("t.png"));
    }

    #[test]
    fn test_missing_column() {
        let tmp = TempDir::new().unwrap();
        let manifest = write_manifest(tmp.path(), "sequence,lat,path\n0,1.0,a.png\n");
        let err = read_manifest(&manifest, &default_columns()).unwrap_err();
        assert!(err.to_string().contains("'lon'"));
    }

    #[test]
    fn test_empty_manifest() {
        let tmp = TempDir::new().unwrap();
        let manifest = write_manifest(tmp.path(), "sequence,lat,lon,path\n");
        assert!(read_manifest(&manifest, &default_columns()).is_err());
    }

    #[test]
    fn test_malformed_tile_fails() {
        let tmp = TempDir::new().unwrap();
        write_tile(tmp.path(), "a.png", 100.0);
        fs::write(tmp.path().join("b.png"), b"garbage").unwrap();
        let manifest = write_manifest(
            tmp.path(),
            "sequence,lat,lon,path\n0,1.0,1.0,a.png\n1,1.0,1.1,b.png\n",
        );
        let out = tmp.path().join("out.json");

        let err = run(
            2,
            CancelToken::new(),
            manifest,
            default_columns(),
            Some(out.clone()),
            OutputFormat::Json,
            false,
        )
        .unwrap_err();

        assert!(format!("{:#}", err).contains("Malformed raster for tile 1"));
        assert!(!out.exists());
    }

    #[test]
    fn test_cancelled_before_reading() {
        let tmp = TempDir::new().unwrap();
        write_tile(tmp.path(), "a.png", 100.0);
        let manifest = write_manifest(tmp.path(), "sequence,lat,lon,path\n0,1.0,1.0,a.png\n");
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = run(
            1,
            cancel,
            manifest,
            default_columns(),
            None,
            OutputFormat::Csv,
            false,
        );
        assert!(result.is_err());
    }
}
