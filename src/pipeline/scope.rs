use crate::gtfs::store::{TransitStore, TripFilter};
use crate::gtfs::structs::{Route, Trip};
use crate::pipeline::config::Config;
use crate::pipeline::dispatch::{self, OutputMap};
use crate::pipeline::error::Error;

use futures::future;
use serde::Serialize;
use std::collections::BTreeMap;

/// Generated GeoJSON for one agency: one Output Map for agency scope, or one
/// per `<routeName>_<directionId>` for route scope.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GeoJsonOutput {
    Agency(OutputMap),
    Routes(BTreeMap<String, OutputMap>),
}

/// Counters accumulated while generating one agency's output.
#[derive(Debug, Default, Clone, Copy)]
pub struct OutputStats {
    /// Routes processed (route scope only)
    pub routes: usize,
    /// Individual GeoJSON payloads produced
    pub files: usize,
}

/// Resolve the configured output scope and run the dispatcher over it.
pub async fn build_geojson(
    store: &dyn TransitStore,
    config: &Config,
) -> Result<(GeoJsonOutput, OutputStats), Error> {
    match config.output_type.as_str() {
        "agency" => {
            let geojson = dispatch::geojson_by_format(store, config, None, None).await?;
            let stats = OutputStats {
                routes: 0,
                files: geojson.len(),
            };
            Ok((GeoJsonOutput::Agency(geojson), stats))
        }
        "route" => {
            let routes = store.routes()?;
            let per_route = future::try_join_all(
                routes.iter().map(|route| route_geojson(store, config, route)),
            )
            .await?;

            let mut all_geo = BTreeMap::new();
            let mut files = 0;
            for route_maps in per_route {
                for (key, map) in route_maps {
                    files += map.len();
                    all_geo.insert(key, map);
                }
            }
            let stats = OutputStats {
                routes: routes.len(),
                files,
            };
            Ok((GeoJsonOutput::Routes(all_geo), stats))
        }
        other => Err(Error::InvalidOutputType(other.to_string())),
    }
}

/// Generate one route's output, partitioned into directions.
///
/// Directions are derived from distinct trip headsigns, first trip seen per
/// headsign. This is a heuristic grouping, not a physical direction, which is
/// why the true `direction_id` stays visible in the output key.
async fn route_geojson(
    store: &dyn TransitStore,
    config: &Config,
    route: &Route,
) -> Result<BTreeMap<String, OutputMap>, Error> {
    let trips = store.trips(&TripFilter {
        route_id: Some(route.route_id.clone()),
        direction_id: None,
    })?;
    let directions = dedupe_by_headsign(&trips);

    let maps = future::try_join_all(directions.iter().map(|direction| {
        dispatch::geojson_by_format(
            store,
            config,
            Some(&route.route_id),
            direction.direction_id,
        )
    }))
    .await?;

    Ok(directions
        .iter()
        .map(|direction| direction_key(route, direction.direction_id))
        .zip(maps)
        .collect())
}

/// First-seen trip per distinct headsign.
fn dedupe_by_headsign(trips: &[Trip]) -> Vec<&Trip> {
    let mut seen: Vec<&Option<String>> = Vec::new();
    let mut directions = Vec::new();
    for trip in trips {
        if seen.contains(&&trip.trip_headsign) {
            continue;
        }
        seen.push(&trip.trip_headsign);
        directions.push(trip);
    }
    directions
}

fn direction_key(route: &Route, direction_id: Option<i64>) -> String {
    match direction_id {
        Some(id) => format!("{}_{}", route.display_name(), id),
        None => format!("{}_", route.display_name()),
    }
}
