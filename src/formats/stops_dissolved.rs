use crate::formats::error::Error;
use crate::formats::geo_util;
use crate::formats::geojson;
use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;

use geo_types::{coord, MultiPolygon};
use serde_json::Value;

/// Stop circles dissolved into one walk-access feature.
pub async fn geojson(
    store: &dyn TransitStore,
    config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<Value, Error> {
    let stops = store.stops(route_id, direction_id)?;
    let circles = stops
        .iter()
        .filter_map(|stop| {
            let (lat, lon) = (stop.stop_lat?, stop.stop_lon?);
            Some(MultiPolygon::new(vec![geo_util::circle(
                coord! { x: lon, y: lat },
                config.buffer_size_meters,
            )]))
        })
        .collect::<Vec<MultiPolygon>>();
    if circles.is_empty() {
        return Err(Error::NoGeometry);
    }
    let dissolved = geo_util::dissolve(circles);
    Ok(geojson::feature(
        geojson::multi_polygon_geometry(&dissolved),
        geojson::scope_properties(route_id, direction_id),
    ))
}
