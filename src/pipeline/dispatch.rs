use crate::formats::{self, OutputFormat};
use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;
use crate::pipeline::error::Error;

use futures::future;
use serde_json::Value;
use std::collections::BTreeMap;

/// GeoJSON results for one scope, keyed by camelCase format label.
pub type OutputMap = BTreeMap<String, Value>;

/// Invoke every requested format generator for the given scope and collect
/// the results.
///
/// Unrecognized `outputFormat` entries are ignored; only when nothing at all
/// was generated does the request fail. A failing generator fails the whole
/// scope (`try_join_all` drops its siblings), so no partial map is returned.
pub async fn geojson_by_format(
    store: &dyn TransitStore,
    config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<OutputMap, Error> {
    let requested = OutputFormat::ALL
        .into_iter()
        .filter(|format| config.output_format.iter().any(|f| f == format.name()))
        .collect::<Vec<OutputFormat>>();

    let results = future::try_join_all(
        requested
            .iter()
            .map(|format| formats::generate(*format, store, config, route_id, direction_id)),
    )
    .await?;

    let all_geo = requested
        .iter()
        .map(|format| format.label().to_string())
        .zip(results)
        .collect::<OutputMap>();

    if all_geo.is_empty() {
        return Err(Error::InvalidOutputFormat(config.output_format.clone()));
    }
    Ok(all_geo)
}
