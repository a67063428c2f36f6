//! Decoded elevation records.

use std::ops::Index;

use serde::Serialize;

use crate::coord::LatLon;

/// An elevation estimate attributed to a tile's anchor coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Elevation {
    from: LatLon,
    meters: f64,
}

impl Elevation {
    pub fn new(from: LatLon, meters: f64) -> Self {
        Self { from, meters }
    }

    /// Anchor coordinate of the tile.
    pub fn from(&self) -> LatLon {
        self.from
    }

    /// Elevation in meters. Negative values are below sea level.
    pub fn meters(&self) -> f64 {
        self.meters
    }
}

/// Elevation records for a route, one per input tile, in sequence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteElevation(Vec<Elevation>);

impl RouteElevation {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Elevation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Elevation] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Elevation> {
        self.0
    }

    /// Lowest elevation on the route, or `None` if it is empty.
    pub fn min_meters(&self) -> Option<f64> {
        self.0.iter().map(Elevation::meters).reduce(f64::min)
    }

    /// Highest elevation on the route, or `None` if it is empty.
    pub fn max_meters(&self) -> Option<f64> {
        self.0.iter().map(Elevation::meters).reduce(f64::max)
    }

    /// Sum of all climbs between consecutive records.
    pub fn total_ascent(&self) -> f64 {
        self.deltas().filter(|d| *d > 0.0).sum()
    }

    /// Sum of all drops between consecutive records, as a positive number.
    pub fn total_descent(&self) -> f64 {
        -self.deltas().filter(|d| *d < 0.0).sum::<f64>()
    }

    fn deltas(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.windows(2).map(|w| w[1].meters - w[0].meters)
    }
}

impl From<Vec<Elevation>> for RouteElevation {
    fn from(records: Vec<Elevation>) -> Self {
        Self(records)
    }
}

impl Index<usize> for RouteElevation {
    type Output = Elevation;

    fn index(&self, index: usize) -> &Elevation {
        &self.0[index]
    }
}

impl IntoIterator for RouteElevation {
    type Item = Elevation;
    type IntoIter = std::vec::IntoIter<Elevation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RouteElevation {
    type Item = &'a Elevation;
    type IntoIter = std::slice::Iter<'a, Elevation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(meters: &[f64]) -> RouteElevation {
        meters
            .iter()
            .enumerate()
            .map(|(i, &m)| Elevation::new(LatLon::new(46.0 + i as f64 * 0.01, 7.0), m))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_accessors() {
        let e = Elevation::new(LatLon::new(35.36, 138.73), 3776.0);
        assert_eq!(e.from(), LatLon::new(35.36, 138.73));
        assert_eq!(e.meters(), 3776.0);
    }

    #[test]
    fn test_min_max() {
        let r = route(&[100.0, -20.0, 350.5, 40.0]);
        assert_eq!(r.min_meters(), Some(-20.0));
        assert_eq!(r.max_meters(), Some(350.5));

        let empty = RouteElevation::default();
        assert_eq!(empty.min_meters(), None);
        assert_eq!(empty.max_meters(), None);
    }

    #[test]
    fn test_ascent_descent() {
        let r = route(&[100.0, 150.0, 120.0, 200.0, 190.0]);
        assert_eq!(r.total_ascent(), 130.0);
        assert_eq!(r.total_descent(), 40.0);
    }

    #[test]
    fn test_ascent_descent_short_routes() {
        assert_eq!(route(&[]).total_ascent(), 0.0);
        assert_eq!(route(&[500.0]).total_descent(), 0.0);
    }

    #[test]
    fn test_index_and_iter() {
        let r = route(&[1.0, 2.0, 3.0]);
        assert_eq!(r.len(), 3);
        assert_eq!(r[1].meters(), 2.0);
        let collected: Vec<f64> = r.iter().map(Elevation::meters).collect();
        assert_eq!(collected, vec![1.0, 2.0, 3.0]);
        assert_eq!(r.into_inner().len(), 3);
    }

    #[test]
    fn test_serializes_as_array() {
        let r = route(&[12.5]);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "from": { "lat": 46.0, "lon": 7.0 }, "meters": 12.5 }])
        );
    }
}
