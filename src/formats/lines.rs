use crate::formats::error::Error;
use crate::formats::geojson;
use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;

use serde_json::Value;

/// One LineString feature per shape in scope.
pub async fn geojson(
    store: &dyn TransitStore,
    _config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<Value, Error> {
    let lines = store.shape_lines(route_id, direction_id)?;
    Ok(geojson::feature_collection(
        lines
            .iter()
            .map(|line| geojson::line_feature(line, route_id, direction_id))
            .collect(),
    ))
}
