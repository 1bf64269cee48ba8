use crate::formats::error::Error;
use crate::formats::geojson;
use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;

use serde_json::Value;

/// One Point feature per stop in scope. Stops without coordinates are
/// skipped.
pub async fn geojson(
    store: &dyn TransitStore,
    _config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<Value, Error> {
    let stops = store.stops(route_id, direction_id)?;
    Ok(geojson::feature_collection(
        stops.iter().filter_map(geojson::stop_feature).collect(),
    ))
}
