use crate::formats::error::Error;
use crate::formats::geojson;
use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;

use geo::BoundingRect;
use geo_types::{Coord, LineString, MultiLineString};
use serde_json::Value;

/// Bounding rectangle of every shape in scope, as a single Polygon feature.
pub async fn geojson(
    store: &dyn TransitStore,
    _config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<Value, Error> {
    let lines = store.shape_lines(route_id, direction_id)?;
    let multi = MultiLineString::new(
        lines
            .iter()
            .map(|line| {
                LineString::new(
                    line.points
                        .iter()
                        .map(|(lon, lat)| Coord { x: *lon, y: *lat })
                        .collect(),
                )
            })
            .collect(),
    );
    let rect = multi.bounding_rect().ok_or(Error::NoGeometry)?;
    Ok(geojson::feature(
        geojson::polygon_geometry(&rect.to_polygon()),
        geojson::scope_properties(route_id, direction_id),
    ))
}
