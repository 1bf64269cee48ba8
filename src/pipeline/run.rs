use crate::gtfs::store::{GtfsStore, TransitStore};
use crate::pipeline::config::{AgencyReturnPolicy, Config};
use crate::pipeline::error::Error;
use crate::pipeline::scope::{self, GeoJsonOutput};

use std::collections::BTreeMap;
use std::time::Instant;

/// Top-level entry point: open the store and process every configured
/// agency. Returns the generated GeoJSON keyed by agency key.
pub async fn run(config: &Config) -> Result<BTreeMap<String, GeoJsonOutput>, Error> {
    let mut store = GtfsStore::open(config.sqlite_path.as_deref())?;
    run_with_store(&mut store, config).await
}

/// Process agencies against an already opened store.
///
/// The loop is deliberately sequential: agencies share the store connection
/// and only one import may be active at a time. An import failure aborts the
/// remaining agencies.
pub async fn run_with_store(
    store: &mut dyn TransitStore,
    config: &Config,
) -> Result<BTreeMap<String, GeoJsonOutput>, Error> {
    if config.agencies.is_empty() {
        return Err(Error::NoAgencies);
    }
    log::info!(
        "Started GeoJSON creation for {} agencies",
        config.agencies.len()
    );

    let mut outputs = BTreeMap::new();
    for agency in &config.agencies {
        let started = Instant::now();

        if !config.skip_import {
            log::info!("Importing feed for {}", agency.agency_key);
            store.import(&agency.agency_key, &agency.path)?;
        }

        log::info!("Starting GeoJSON creation for {}", agency.agency_key);
        let (geojson, stats) = scope::build_geojson(&*store, config).await?;
        log::info!(
            "GeoJSON generation for {} required {:.1} seconds ({} routes, {} files)",
            agency.agency_key,
            started.elapsed().as_secs_f64(),
            stats.routes,
            stats.files
        );

        outputs.insert(agency.agency_key.clone(), geojson);
        if config.agency_return_policy == AgencyReturnPolicy::FirstOnly {
            break;
        }
    }
    Ok(outputs)
}

#[cfg(test)]
mod test {
    use super::run_with_store;
    use crate::gtfs::testing::memory_store;
    use crate::pipeline::config::{AgencyConfig, AgencyReturnPolicy, Config};
    use crate::pipeline::error::Error;

    fn agency(key: &str) -> AgencyConfig {
        AgencyConfig {
            agency_key: key.to_string(),
            path: std::path::PathBuf::from(format!("/tmp/{key}")),
        }
    }

    fn two_agency_config() -> Config {
        Config {
            agencies: vec![agency("caltrain"), agency("bart")],
            output_format: vec!["stops".to_string()],
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn aggregate_all_keeps_every_agency() {
        let mut store = memory_store();
        let config = two_agency_config();
        let outputs = run_with_store(&mut store, &config).await.unwrap();
        assert_eq!(
            outputs.keys().collect::<Vec<_>>(),
            vec!["bart", "caltrain"]
        );
        assert_eq!(store.imported, vec!["caltrain", "bart"]);
    }

    #[tokio::test]
    async fn first_only_stops_after_the_first_agency() {
        let mut store = memory_store();
        let config = Config {
            agency_return_policy: AgencyReturnPolicy::FirstOnly,
            ..two_agency_config()
        };
        let outputs = run_with_store(&mut store, &config).await.unwrap();
        assert_eq!(outputs.keys().collect::<Vec<_>>(), vec!["caltrain"]);
        assert_eq!(store.imported, vec!["caltrain"]);
    }

    #[tokio::test]
    async fn skip_import_leaves_the_store_untouched_and_is_idempotent() {
        let mut store = memory_store();
        let config = Config {
            skip_import: true,
            ..two_agency_config()
        };
        let first = run_with_store(&mut store, &config).await.unwrap();
        let second = run_with_store(&mut store, &config).await.unwrap();
        assert!(store.imported.is_empty());
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn import_failure_aborts_the_run() {
        let mut store = memory_store();
        store.fail_import = true;
        let config = two_agency_config();
        let result = run_with_store(&mut store, &config).await;
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn empty_agency_list_is_rejected() {
        let mut store = memory_store();
        let config = Config::default();
        assert!(matches!(
            run_with_store(&mut store, &config).await,
            Err(Error::NoAgencies)
        ));
    }
}
