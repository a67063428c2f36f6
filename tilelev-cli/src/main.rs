use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tilelev::CancelToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::decode::{ManifestColumns, OutputFormat};

/// Terrain-RGB route elevation CLI tool
#[derive(Parser)]
#[command(name = "tilelev")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Worker threads for decoding (0 = one per CPU, 1 = sequential)
    #[arg(
        short,
        long,
        env = "TILELEV_THREADS",
        default_value = "0",
        global = true
    )]
    threads: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode the tiles listed in a manifest into a route elevation profile
    Decode {
        /// Manifest CSV with one row per tile
        manifest: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// Column name for the tile sequence number
        #[arg(long, default_value = "sequence")]
        seq_col: String,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,

        /// Column name for the tile PNG path
        #[arg(long, default_value = "path")]
        path_col: String,

        /// Print route statistics to stderr
        #[arg(short, long)]
        summary: bool,
    },

    /// Show the quadrant samples and elevation of a single tile
    Sample {
        /// Path to a 256x256 terrain-RGB PNG
        tile: PathBuf,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Write a uniform terrain-RGB tile for a given elevation
    Encode {
        /// Elevation in meters
        #[arg(long, allow_hyphen_values = true)]
        meters: f64,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "tilelev=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            manifest,
            output,
            format,
            seq_col,
            lat_col,
            lon_col,
            path_col,
            summary,
        } => {
            let cancel = CancelToken::new();
            let handle = cancel.clone();
            ctrlc::set_handler(move || handle.cancel())
                .context("Failed to install Ctrl-C handler")?;

            let columns = ManifestColumns {
                sequence: seq_col,
                lat: lat_col,
                lon: lon_col,
                path: path_col,
            };
            commands::decode::run(
                cli.threads,
                cancel,
                manifest,
                columns,
                output,
                format,
                summary,
            )
        }
        Commands::Sample { tile, json } => commands::sample::run(tile, json),
        Commands::Encode { meters, output } => commands::encode::run(meters, output),
    }
}
