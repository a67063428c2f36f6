//! Route elevation decoding.
//!
//! This module provides [`TileElevationDecoder`], which turns a set of
//! terrain-RGB tiles into one [`Elevation`] per tile.
//!
//! Tiles are independent, so they are decoded in parallel on a rayon pool.
//! The call is all-or-nothing: the first malformed tile or a cancellation
//! request aborts the remaining work and is returned as the only result.

use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::coord::{EncodedElevationData, TileCoordinate};
use crate::elevation::{Elevation, RouteElevation};
use crate::error::{DecodeError, Result};
use crate::raster::RasterTile;

/// How tile work is scheduled.
#[derive(Debug)]
enum Workers {
    /// Decode on the calling thread.
    Sequential,
    /// Use rayon's global pool.
    Global,
    /// Use a dedicated pool.
    Pool(ThreadPool),
}

/// Decodes terrain-RGB tiles into a route elevation profile.
///
/// # Example
///
/// ```ignore
/// use tilelev::{CancelToken, EncodedElevationData, TileElevationDecoder};
///
/// let decoder = TileElevationDecoder::builder().threads(4).build()?;
/// let cancel = CancelToken::new();
///
/// let route = decoder.decode(&data, &cancel)?;
/// for elevation in &route {
///     println!("{:?}: {:.1}m", elevation.from(), elevation.meters());
/// }
/// ```
#[derive(Debug)]
pub struct TileElevationDecoder {
    workers: Workers,
}

impl TileElevationDecoder {
    /// Create a decoder that runs on rayon's global pool.
    pub fn new() -> Self {
        Self {
            workers: Workers::Global,
        }
    }

    /// Create a builder for more configuration options.
    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::new()
    }

    /// Decode every tile in `data`.
    ///
    /// Returns one [`Elevation`] per tile, ordered by ascending tile
    /// sequence. `cancel` is checked before each tile is decoded.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::MalformedRaster`] if any tile is not a 256×256 PNG
    /// - [`DecodeError::Cancelled`] if `cancel` fired during the call
    ///
    /// In both cases no elevations are returned.
    #[tracing::instrument(level = "debug", skip_all, fields(tiles = data.len()))]
    pub fn decode(
        &self,
        data: &EncodedElevationData,
        cancel: &CancelToken,
    ) -> Result<RouteElevation> {
        let start = Instant::now();
        let tiles: Vec<(TileCoordinate, &[u8])> = data.iter().collect();

        let result = match &self.workers {
            Workers::Sequential => decode_sequential(&tiles, cancel),
            Workers::Global => decode_parallel(&tiles, cancel),
            Workers::Pool(pool) => pool.install(|| decode_parallel(&tiles, cancel)),
        };

        // A cancellation that lands after the last tile still wins.
        if cancel.is_cancelled() {
            warn!(tiles = tiles.len(), "decode cancelled");
            return Err(DecodeError::Cancelled);
        }

        let elevations = result?;
        info!(
            tiles = elevations.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "decoded route elevation"
        );
        Ok(elevations.into())
    }

    /// Decode every tile in `data` without a cancellation signal.
    pub fn decode_all(&self, data: &EncodedElevationData) -> Result<RouteElevation> {
        self.decode(data, &CancelToken::new())
    }
}

impl Default for TileElevationDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_sequential(
    tiles: &[(TileCoordinate, &[u8])],
    cancel: &CancelToken,
) -> Result<Vec<Elevation>> {
    let mut elevations = Vec::with_capacity(tiles.len());
    for (coord, png) in tiles {
        if cancel.is_cancelled() {
            return Err(DecodeError::Cancelled);
        }
        elevations.push(decode_tile(*coord, png)?);
    }
    Ok(elevations)
}

/// Fan out over the current rayon pool.
///
/// Collecting into `Result` stops handing out new tiles after the first
/// error, and the indexed collect keeps input order.
fn decode_parallel(
    tiles: &[(TileCoordinate, &[u8])],
    cancel: &CancelToken,
) -> Result<Vec<Elevation>> {
    tiles
        .par_iter()
        .map(|(coord, png)| {
            if cancel.is_cancelled() {
                return Err(DecodeError::Cancelled);
            }
            decode_tile(*coord, png)
        })
        .collect()
}

fn decode_tile(coord: TileCoordinate, png: &[u8]) -> Result<Elevation> {
    let tile = RasterTile::from_png(png).map_err(|e| {
        let e = e.for_tile(coord.sequence);
        warn!(sequence = coord.sequence, error = %e, "malformed tile");
        e
    })?;
    let meters = tile.mean_elevation();
    debug!(sequence = coord.sequence, meters, "decoded tile");
    Ok(Elevation::new(coord.from, meters))
}

/// Builder for [`TileElevationDecoder`].
///
/// # Example
///
/// ```ignore
/// use tilelev::DecoderBuilder;
///
/// let decoder = DecoderBuilder::from_env().threads(2).build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecoderBuilder {
    threads: usize,
}

impl DecoderBuilder {
    /// Create a builder using rayon's global pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TILELEV_THREADS` | Worker threads (0 = rayon default, 1 = sequential) | 0 |
    pub fn from_env() -> Self {
        let threads = std::env::var("TILELEV_THREADS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        Self { threads }
    }

    /// Set the number of worker threads.
    ///
    /// `0` uses rayon's global pool, `1` decodes on the calling thread and
    /// anything larger builds a dedicated pool of that size.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Build the [`TileElevationDecoder`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ThreadPool`] if a dedicated pool cannot be
    /// created.
    pub fn build(self) -> Result<TileElevationDecoder> {
        let workers = match self.threads {
            0 => Workers::Global,
            1 => Workers::Sequential,
            n => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("tilelev-{i}"))
                    .build()
                    .map_err(|e| DecodeError::ThreadPool(e.to_string()))?;
                Workers::Pool(pool)
            }
        };
        Ok(TileElevationDecoder { workers })
    }
}
