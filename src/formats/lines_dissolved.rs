use crate::formats::error::Error;
use crate::formats::geo_util;
use crate::formats::geojson;
use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;

use serde_json::Value;

/// All scoped shapes buffered by `bufferSizeMeters` and dissolved into one
/// corridor feature.
pub async fn geojson(
    store: &dyn TransitStore,
    config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<Value, Error> {
    let lines = store.shape_lines(route_id, direction_id)?;
    if lines.is_empty() {
        return Err(Error::NoGeometry);
    }
    let dissolved = geo_util::dissolve(
        lines
            .iter()
            .map(|line| geo_util::buffer_line(&line.points, config.buffer_size_meters)),
    );
    Ok(geojson::feature(
        geojson::multi_polygon_geometry(&dissolved),
        geojson::scope_properties(route_id, direction_id),
    ))
}
