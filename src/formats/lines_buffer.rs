use crate::formats::error::Error;
use crate::formats::geo_util;
use crate::formats::geojson;
use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;

use serde_json::{json, Value};

/// Each shape in scope buffered by `bufferSizeMeters`, one feature per shape.
pub async fn geojson(
    store: &dyn TransitStore,
    config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<Value, Error> {
    let lines = store.shape_lines(route_id, direction_id)?;
    let features = lines
        .iter()
        .map(|line| {
            let buffered = geo_util::buffer_line(&line.points, config.buffer_size_meters);
            geojson::feature(
                geojson::multi_polygon_geometry(&buffered),
                json!({
                    "shape_id": &line.shape_id,
                    "route_id": route_id,
                    "direction_id": direction_id,
                    "buffer_size_meters": config.buffer_size_meters,
                }),
            )
        })
        .collect::<Vec<Value>>();
    Ok(geojson::feature_collection(features))
}
