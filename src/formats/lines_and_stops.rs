use crate::formats::error::Error;
use crate::formats::geojson;
use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;

use serde_json::Value;

/// Line features and stop features combined in one collection. Default
/// output format.
pub async fn geojson(
    store: &dyn TransitStore,
    _config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<Value, Error> {
    let lines = store.shape_lines(route_id, direction_id)?;
    let stops = store.stops(route_id, direction_id)?;

    let mut features = lines
        .iter()
        .map(|line| geojson::line_feature(line, route_id, direction_id))
        .collect::<Vec<Value>>();
    features.extend(stops.iter().filter_map(geojson::stop_feature));

    Ok(geojson::feature_collection(features))
}
