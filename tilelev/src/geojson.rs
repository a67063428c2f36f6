//! GeoJSON export of route elevations.
//!
//! This module converts a [`RouteElevation`] into GeoJSON so it can be fed
//! to mapping tools. Enable the `geojson` feature to use this module.
//!
//! # Example
//!
//! ```ignore
//! use tilelev::geojson::route_to_geometry;
//!
//! let route = decoder.decode_all(&data)?;
//! let geometry = route_to_geometry(&route);
//! // {"type": "LineString", "coordinates": [[7.98, 46.55, 3454.0], ...]}
//! ```

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};

use crate::elevation::{Elevation, RouteElevation};

/// GeoJSON position `[lon, lat, elevation]`.
fn position(elevation: &Elevation) -> Vec<f64> {
    let from = elevation.from();
    vec![from.lon, from.lat, elevation.meters()]
}

/// Convert a route into a 3D GeoJSON geometry.
///
/// A route with a single record becomes a `Point`; anything else becomes a
/// `LineString` (possibly empty).
pub fn route_to_geometry(route: &RouteElevation) -> Geometry {
    let value = match route.as_slice() {
        [single] => Value::Point(position(single)),
        records => Value::LineString(records.iter().map(position).collect()),
    };
    Geometry::new(value)
}

/// Convert a route into a collection of `Point` features.
///
/// Each feature carries its position along the route as `index` and the
/// elevation in meters as `elevation`.
pub fn route_to_feature_collection(route: &RouteElevation) -> FeatureCollection {
    let features = route
        .iter()
        .enumerate()
        .map(|(index, elevation)| {
            let mut properties = JsonObject::new();
            properties.insert("index".to_string(), JsonValue::from(index));
            properties.insert("elevation".to_string(), JsonValue::from(elevation.meters()));
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(position(elevation)))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
