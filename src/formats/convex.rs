use crate::formats::error::Error;
use crate::formats::geojson;
use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;

use geo::ConvexHull;
use geo_types::{MultiPoint, Point};
use serde_json::Value;

/// Convex hull of every shape point in scope, as a single Polygon feature.
pub async fn geojson(
    store: &dyn TransitStore,
    _config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<Value, Error> {
    let lines = store.shape_lines(route_id, direction_id)?;
    let points = lines
        .iter()
        .flat_map(|line| line.points.iter())
        .map(|(lon, lat)| Point::new(*lon, *lat))
        .collect::<Vec<Point>>();
    if points.len() < 3 {
        return Err(Error::NoGeometry);
    }
    let hull = MultiPoint::new(points).convex_hull();
    Ok(geojson::feature(
        geojson::polygon_geometry(&hull),
        geojson::scope_properties(route_id, direction_id),
    ))
}
