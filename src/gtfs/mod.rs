pub mod error;
pub mod store;
pub mod structs;

#[cfg(test)]
pub(crate) mod testing {
    use crate::gtfs::error::Error;
    use crate::gtfs::store::{TransitStore, TripFilter};
    use crate::gtfs::structs::{Route, Shape, ShapeLine, Stop, StopTime, Trip};
    use std::path::{Path, PathBuf};

    /// In-memory stand-in for the sqlite store, mirroring its query scoping.
    #[derive(Default)]
    pub struct MemoryStore {
        pub routes: Vec<Route>,
        pub trips: Vec<Trip>,
        pub stops: Vec<Stop>,
        pub stop_times: Vec<StopTime>,
        pub shapes: Vec<Shape>,
        pub imported: Vec<String>,
        pub fail_import: bool,
    }

    impl MemoryStore {
        fn trip_in_scope(&self, trip: &Trip, route_id: &str, direction_id: Option<i64>) -> bool {
            trip.route_id == route_id
                && direction_id.map_or(true, |d| trip.direction_id == Some(d))
        }
    }

    impl TransitStore for MemoryStore {
        fn import(&mut self, agency_key: &str, _path: &Path) -> Result<(), Error> {
            if self.fail_import {
                return Err(Error::MissingFile("routes.txt".to_string()));
            }
            self.imported.push(agency_key.to_string());
            Ok(())
        }

        fn routes(&self) -> Result<Vec<Route>, Error> {
            Ok(self.routes.clone())
        }

        fn trips(&self, filter: &TripFilter) -> Result<Vec<Trip>, Error> {
            Ok(self
                .trips
                .iter()
                .filter(|t| filter.route_id.as_deref().map_or(true, |r| t.route_id == r))
                .filter(|t| filter.direction_id.map_or(true, |d| t.direction_id == Some(d)))
                .cloned()
                .collect())
        }

        fn stops(
            &self,
            route_id: Option<&str>,
            direction_id: Option<i64>,
        ) -> Result<Vec<Stop>, Error> {
            let Some(route_id) = route_id else {
                return Ok(self.stops.clone());
            };
            let stop_ids: Vec<&str> = self
                .stop_times
                .iter()
                .filter(|st| {
                    self.trips
                        .iter()
                        .any(|t| t.trip_id == st.trip_id && self.trip_in_scope(t, route_id, direction_id))
                })
                .map(|st| st.stop_id.as_str())
                .collect();
            Ok(self
                .stops
                .iter()
                .filter(|s| stop_ids.contains(&s.stop_id.as_str()))
                .cloned()
                .collect())
        }

        fn shape_lines(
            &self,
            route_id: Option<&str>,
            direction_id: Option<i64>,
        ) -> Result<Vec<ShapeLine>, Error> {
            let mut shape_ids: Vec<&str> = match route_id {
                Some(route_id) => self
                    .trips
                    .iter()
                    .filter(|t| self.trip_in_scope(t, route_id, direction_id))
                    .filter_map(|t| t.shape_id.as_deref())
                    .collect(),
                None => self.shapes.iter().map(|s| s.shape_id.as_str()).collect(),
            };
            shape_ids.sort_unstable();
            shape_ids.dedup();

            let mut lines = Vec::new();
            for shape_id in shape_ids {
                let mut points: Vec<&Shape> = self
                    .shapes
                    .iter()
                    .filter(|s| s.shape_id == shape_id)
                    .collect();
                if points.is_empty() {
                    continue;
                }
                points.sort_by_key(|p| p.shape_pt_sequence);
                lines.push(ShapeLine {
                    shape_id: shape_id.to_string(),
                    points: points
                        .iter()
                        .map(|p| (p.shape_pt_lon, p.shape_pt_lat))
                        .collect(),
                });
            }
            Ok(lines)
        }
    }

    /// A small two-route dataset shared by pipeline and format tests.
    ///
    /// Route `r1` ("10") has trips in two headsign-distinct directions and
    /// shape `sh1`; route `r2` ("Airport Express") has one direction and
    /// shape `sh2`.
    pub fn memory_store() -> MemoryStore {
        let route = |id: &str, short: Option<&str>, long: Option<&str>| Route {
            route_id: id.to_string(),
            agency_id: None,
            route_short_name: short.map(String::from),
            route_long_name: long.map(String::from),
            route_type: Some(3),
        };
        let trip = |id: &str, route: &str, headsign: &str, dir: i64, shape: &str| Trip {
            trip_id: id.to_string(),
            route_id: route.to_string(),
            service_id: "weekday".to_string(),
            trip_headsign: Some(headsign.to_string()),
            direction_id: Some(dir),
            shape_id: Some(shape.to_string()),
        };
        let stop = |id: &str, name: &str, lat: f64, lon: f64| Stop {
            stop_id: id.to_string(),
            stop_code: None,
            stop_name: Some(name.to_string()),
            stop_lat: Some(lat),
            stop_lon: Some(lon),
            parent_station: None,
        };
        let stop_time = |trip: &str, stop: &str, seq: i64| StopTime {
            trip_id: trip.to_string(),
            stop_id: stop.to_string(),
            stop_sequence: seq,
        };
        let shape_pt = |id: &str, lat: f64, lon: f64, seq: i64| Shape {
            shape_id: id.to_string(),
            shape_pt_lat: lat,
            shape_pt_lon: lon,
            shape_pt_sequence: seq,
        };

        MemoryStore {
            routes: vec![
                route("r1", Some("10"), Some("Main Street")),
                route("r2", None, Some("Airport Express")),
            ],
            trips: vec![
                trip("t1", "r1", "Northbound", 0, "sh1"),
                trip("t2", "r1", "Northbound", 0, "sh1"),
                trip("t3", "r1", "Southbound", 1, "sh1"),
                trip("t4", "r2", "Airport", 0, "sh2"),
            ],
            stops: vec![
                stop("s1", "First & Main", 37.0, -122.0),
                stop("s2", "Second & Main", 37.02, -122.02),
                stop("s3", "Airport Terminal", 37.1, -122.1),
            ],
            stop_times: vec![
                stop_time("t1", "s1", 1),
                stop_time("t1", "s2", 2),
                stop_time("t3", "s2", 1),
                stop_time("t3", "s1", 2),
                stop_time("t4", "s3", 1),
            ],
            shapes: vec![
                shape_pt("sh1", 37.01, -122.01, 2),
                shape_pt("sh1", 37.0, -122.0, 1),
                shape_pt("sh1", 37.02, -122.02, 3),
                shape_pt("sh2", 37.1, -122.1, 1),
                shape_pt("sh2", 37.12, -122.12, 2),
            ],
            imported: Vec::new(),
            fail_import: false,
        }
    }

    /// Write a feed fixture directory under the system temp dir and return
    /// its path. Contents match [`memory_store`].
    pub fn write_feed_fixture(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("gtfs-geojson-fixtures").join(name);
        std::fs::create_dir_all(&dir).expect("create fixture dir");

        // routes.txt carries a UTF-8 BOM to exercise the BOM-aware reader.
        std::fs::write(
            dir.join("routes.txt"),
            "\u{feff}route_id,route_short_name,route_long_name,route_type\n\
             r1,10,Main Street,3\n\
             r2,,Airport Express,3\n",
        )
        .expect("write routes.txt");

        std::fs::write(
            dir.join("trips.txt"),
            "route_id,service_id,trip_id,trip_headsign,direction_id,shape_id\n\
             r1,weekday,t1,Northbound,0,sh1\n\
             r1,weekday,t2,Northbound,0,sh1\n\
             r1,weekday,t3,Southbound,1,sh1\n\
             r2,weekday,t4,Airport,0,sh2\n",
        )
        .expect("write trips.txt");

        std::fs::write(
            dir.join("stops.txt"),
            "stop_id,stop_name,stop_lat,stop_lon\n\
             s1,First & Main,37.0,-122.0\n\
             s2,Second & Main,37.02,-122.02\n\
             s3,Airport Terminal,37.1,-122.1\n",
        )
        .expect("write stops.txt");

        std::fs::write(
            dir.join("stop_times.txt"),
            "trip_id,stop_id,stop_sequence\n\
             t1,s1,1\n\
             t1,s2,2\n\
             t3,s2,1\n\
             t3,s1,2\n\
             t4,s3,1\n",
        )
        .expect("write stop_times.txt");

        std::fs::write(
            dir.join("shapes.txt"),
            "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\n\
             sh1,37.01,-122.01,2\n\
             sh1,37.0,-122.0,1\n\
             sh1,37.02,-122.02,3\n\
             sh2,37.1,-122.1,1\n\
             sh2,37.12,-122.12,2\n",
        )
        .expect("write shapes.txt");

        dir
    }
}
