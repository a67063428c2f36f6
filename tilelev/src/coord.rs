//! Tile keys and the encoded tile collection handed to the decoder.

use std::collections::btree_map::{self, BTreeMap};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A geographic coordinate in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Identifies one raster tile's position along a route.
///
/// `sequence` is assigned by the caller and is the only thing the decoder
/// orders by. `from` is the anchor coordinate the tile's elevation estimate
/// is attributed to. Two coordinates with the same sequence are the same key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TileCoordinate {
    /// Position of the tile along the route.
    pub sequence: u32,
    /// Anchor coordinate for this tile's elevation.
    pub from: LatLon,
}

impl TileCoordinate {
    pub fn new(sequence: u32, from: LatLon) -> Self {
        Self { sequence, from }
    }
}

impl PartialEq for TileCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl Eq for TileCoordinate {}

impl Hash for TileCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sequence.hash(state);
    }
}

/// Raw PNG bytes for a set of tiles, keyed by tile sequence.
///
/// Built by whatever fetched the tiles and passed by reference to
/// [`TileElevationDecoder::decode`](crate::TileElevationDecoder::decode).
///
/// # Example
///
/// ```ignore
/// use tilelev::{EncodedElevationData, LatLon, TileCoordinate};
///
/// let mut data = EncodedElevationData::new();
/// data.insert(TileCoordinate::new(0, LatLon::new(46.55, 7.98)), png_bytes);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EncodedElevationData {
    tiles: BTreeMap<u32, (LatLon, Vec<u8>)>,
}

impl EncodedElevationData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the raw bytes for a tile.
    ///
    /// If a tile with the same sequence is already present its bytes are
    /// replaced and returned.
    pub fn insert(&mut self, coord: TileCoordinate, png: Vec<u8>) -> Option<Vec<u8>> {
        self.tiles
            .insert(coord.sequence, (coord.from, png))
            .map(|(_, old)| old)
    }

    /// Number of tiles in the collection.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate tiles in ascending sequence order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.tiles.iter(),
        }
    }
}

/// Iterator over `(TileCoordinate, bytes)` pairs, see [`EncodedElevationData::iter`].
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, u32, (LatLon, Vec<u8>)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (TileCoordinate, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(&sequence, (from, png))| (TileCoordinate::new(sequence, *from), png.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a EncodedElevationData {
    type Item = (TileCoordinate, &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(TileCoordinate, Vec<u8>)> for EncodedElevationData {
    fn from_iter<I: IntoIterator<Item = (TileCoordinate, Vec<u8>)>>(iter: I) -> Self {
        let mut data = Self::new();
        data.extend(iter);
        data
    }
}

impl Extend<(TileCoordinate, Vec<u8>)> for EncodedElevationData {
    fn extend<I: IntoIterator<Item = (TileCoordinate, Vec<u8>)>>(&mut self, iter: I) {
        for (coord, png) in iter {
            self.insert(coord, png);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn coord(sequence: u32, lat: f64, lon: f64) -> TileCoordinate {
        TileCoordinate::new(sequence, LatLon::new(lat, lon))
    }

    #[test]
    fn test_tile_coordinate_equality_is_by_sequence() {
        assert_eq!(coord(1, 10.0, 20.0), coord(1, -5.0, 3.0));
        assert_ne!(coord(1, 10.0, 20.0), coord(2, 10.0, 20.0));

        let keys: HashSet<_> = [coord(1, 0.0, 0.0), coord(1, 1.0, 1.0), coord(2, 0.0, 0.0)]
            .into_iter()
            .collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_insert_replaces_same_sequence() {
        let mut data = EncodedElevationData::new();
        assert!(data.insert(coord(0, 1.0, 1.0), vec![1]).is_none());
        let old = data.insert(coord(0, 2.0, 2.0), vec![2]);
        assert_eq!(old, Some(vec![1]));
        assert_eq!(data.len(), 1);

        let (c, bytes) = data.iter().next().unwrap();
        assert_eq!(c.from, LatLon::new(2.0, 2.0));
        assert_eq!(bytes, &[2]);
    }

    #[test]
    fn test_iter_is_sequence_ordered() {
        let data: EncodedElevationData = vec![
            (coord(5, 0.0, 0.0), vec![5]),
            (coord(1, 0.0, 0.0), vec![1]),
            (coord(3, 0.0, 0.0), vec![3]),
        ]
        .into_iter()
        .collect();

        let order: Vec<u32> = data.iter().map(|(c, _)| c.sequence).collect();
        assert_eq!(order, vec![1, 3, 5]);
        assert_eq!(data.iter().len(), 3);
    }

    #[test]
    fn test_empty() {
        let data = EncodedElevationData::new();
        assert!(data.is_empty());
        assert_eq!(data.len(), 0);
        assert!(data.iter().next().is_none());
    }
}
