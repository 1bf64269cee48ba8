use crate::gtfs::structs::{ShapeLine, Stop};

use geo_types::{LineString, MultiPolygon, Polygon};
use serde_json::{json, Value};

pub fn feature_collection(features: Vec<Value>) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

pub fn feature(geometry: Value, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    })
}

/// Properties shared by single-feature outputs, recording the scope the
/// geometry was generated for.
pub fn scope_properties(route_id: Option<&str>, direction_id: Option<i64>) -> Value {
    json!({
        "route_id": route_id,
        "direction_id": direction_id,
    })
}

// Build a line feature from one shape
pub fn line_feature(line: &ShapeLine, route_id: Option<&str>, direction_id: Option<i64>) -> Value {
    let coordinates = line
        .points
        .iter()
        .map(|(lon, lat)| [*lon, *lat])
        .collect::<Vec<[f64; 2]>>();
    json!({
        "type": "Feature",
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        },
        "properties": {
            "shape_id": &line.shape_id,
            "route_id": route_id,
            "direction_id": direction_id,
        }
    })
}

// Build a stop feature from gtfs data
pub fn stop_feature(stop: &Stop) -> Option<Value> {
    let (lat, lon) = (stop.stop_lat?, stop.stop_lon?);
    Some(json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [lon, lat]
        },
        "properties": {
            "stop_id": &stop.stop_id,
            "stop_name": &stop.stop_name,
            "stop_code": &stop.stop_code,
            "stop_parent_station": &stop.parent_station,
            "stop_lon": lon,
            "stop_lat": lat,
        }
    }))
}

fn ring_coordinates(ring: &LineString) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

fn polygon_rings(polygon: &Polygon) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors().iter())
        .map(ring_coordinates)
        .collect()
}

pub fn polygon_geometry(polygon: &Polygon) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": polygon_rings(polygon),
    })
}

pub fn multi_polygon_geometry(multi: &MultiPolygon) -> Value {
    json!({
        "type": "MultiPolygon",
        "coordinates": multi.0.iter().map(polygon_rings).collect::<Vec<_>>(),
    })
}
