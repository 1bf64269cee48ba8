use crate::formats::error::Error;
use crate::formats::geo_util;
use crate::formats::geojson;
use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;

use geo_types::coord;
use serde_json::{json, Value};

/// A circle of radius `bufferSizeMeters` around each stop in scope.
pub async fn geojson(
    store: &dyn TransitStore,
    config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<Value, Error> {
    let stops = store.stops(route_id, direction_id)?;
    let features = stops
        .iter()
        .filter_map(|stop| {
            let (lat, lon) = (stop.stop_lat?, stop.stop_lon?);
            let circle = geo_util::circle(coord! { x: lon, y: lat }, config.buffer_size_meters);
            Some(geojson::feature(
                geojson::polygon_geometry(&circle),
                json!({
                    "stop_id": &stop.stop_id,
                    "stop_name": &stop.stop_name,
                    "buffer_size_meters": config.buffer_size_meters,
                }),
            ))
        })
        .collect::<Vec<Value>>();
    Ok(geojson::feature_collection(features))
}

#[cfg(test)]
mod test {
    use crate::gtfs::testing::memory_store;
    use crate::pipeline::config::Config;

    #[tokio::test]
    async fn one_circle_per_stop() {
        let store = memory_store();
        let out = super::geojson(&store, &Config::default(), Some("r2"), None)
            .await
            .unwrap();
        let features = out["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["stop_id"], "s3");
        assert_eq!(features[0]["geometry"]["type"], "Polygon");
    }
}
