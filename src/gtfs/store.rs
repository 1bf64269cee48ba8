use crate::gtfs::error::Error;
use crate::gtfs::structs::{Route, Shape, ShapeLine, Stop, StopTime, Trip};

use rusqlite::{params, Connection};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Filter for trip queries. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    pub route_id: Option<String>,
    pub direction_id: Option<i64>,
}

/// Query and import surface of the transit data store.
///
/// The generation pipeline only talks to this trait, so tests can substitute
/// an in-memory store for the sqlite-backed one.
pub trait TransitStore {
    /// Import a feed (directory or zip archive) for one agency, replacing any
    /// rows previously imported under the same `agency_key`.
    fn import(&mut self, agency_key: &str, path: &Path) -> Result<(), Error>;

    /// All routes currently in the store.
    fn routes(&self) -> Result<Vec<Route>, Error>;

    /// Trips matching the filter.
    fn trips(&self, filter: &TripFilter) -> Result<Vec<Trip>, Error>;

    /// Stops served within the given scope. Unscoped returns every stop;
    /// a route scope restricts to stops reached by that route's trips.
    fn stops(&self, route_id: Option<&str>, direction_id: Option<i64>)
        -> Result<Vec<Stop>, Error>;

    /// Shape lines within the given scope, points ordered by sequence.
    fn shape_lines(
        &self,
        route_id: Option<&str>,
        direction_id: Option<i64>,
    ) -> Result<Vec<ShapeLine>, Error>;
}

/// Sqlite-backed transit store.
pub struct GtfsStore {
    conn: Connection,
}

impl GtfsStore {
    /// Open the store at `path`, or in memory when `path` is `None`, and
    /// ensure the schema exists.
    pub fn open(path: Option<&Path>) -> Result<GtfsStore, Error> {
        let conn = match path {
            Some(p) => Connection::open(p)?,
            None => Connection::open_in_memory()?,
        };
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS gtfs_routes (
                agency_key TEXT NOT NULL,
                route_id TEXT NOT NULL,
                agency_id TEXT,
                route_short_name TEXT,
                route_long_name TEXT,
                route_type INTEGER
            );
            CREATE TABLE IF NOT EXISTS gtfs_trips (
                agency_key TEXT NOT NULL,
                trip_id TEXT NOT NULL,
                route_id TEXT NOT NULL,
                service_id TEXT NOT NULL,
                trip_headsign TEXT,
                direction_id INTEGER,
                shape_id TEXT
            );
            CREATE TABLE IF NOT EXISTS gtfs_stops (
                agency_key TEXT NOT NULL,
                stop_id TEXT NOT NULL,
                stop_code TEXT,
                stop_name TEXT,
                stop_lat REAL,
                stop_lon REAL,
                parent_station TEXT
            );
            CREATE TABLE IF NOT EXISTS gtfs_stop_times (
                agency_key TEXT NOT NULL,
                trip_id TEXT NOT NULL,
                stop_id TEXT NOT NULL,
                stop_sequence INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS gtfs_shapes (
                agency_key TEXT NOT NULL,
                shape_id TEXT NOT NULL,
                shape_pt_lat REAL NOT NULL,
                shape_pt_lon REAL NOT NULL,
                shape_pt_sequence INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_trips_route ON gtfs_trips (route_id);
            CREATE INDEX IF NOT EXISTS idx_stop_times_trip ON gtfs_stop_times (trip_id);
            CREATE INDEX IF NOT EXISTS idx_shapes_id ON gtfs_shapes (shape_id);",
        )?;
        Ok(GtfsStore { conn })
    }
}

impl TransitStore for GtfsStore {
    fn import(&mut self, agency_key: &str, path: &Path) -> Result<(), Error> {
        let feed = Feed::from_path(path)?;
        log::debug!(
            "Read feed for {}: {} routes, {} trips, {} stops, {} stop times, {} shape points",
            agency_key,
            feed.routes.len(),
            feed.trips.len(),
            feed.stops.len(),
            feed.stop_times.len(),
            feed.shapes.len()
        );

        let tx = self.conn.transaction()?;
        for table in [
            "gtfs_routes",
            "gtfs_trips",
            "gtfs_stops",
            "gtfs_stop_times",
            "gtfs_shapes",
        ] {
            tx.execute(
                &format!("DELETE FROM {} WHERE agency_key = ?1", table),
                params![agency_key],
            )?;
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO gtfs_routes (agency_key, route_id, agency_id, route_short_name, route_long_name, route_type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for r in &feed.routes {
                stmt.execute(params![
                    agency_key,
                    r.route_id,
                    r.agency_id,
                    r.route_short_name,
                    r.route_long_name,
                    r.route_type,
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO gtfs_trips (agency_key, trip_id, route_id, service_id, trip_headsign, direction_id, shape_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for t in &feed.trips {
                stmt.execute(params![
                    agency_key,
                    t.trip_id,
                    t.route_id,
                    t.service_id,
                    t.trip_headsign,
                    t.direction_id,
                    t.shape_id,
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO gtfs_stops (agency_key, stop_id, stop_code, stop_name, stop_lat, stop_lon, parent_station)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for s in &feed.stops {
                stmt.execute(params![
                    agency_key,
                    s.stop_id,
                    s.stop_code,
                    s.stop_name,
                    s.stop_lat,
                    s.stop_lon,
                    s.parent_station,
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO gtfs_stop_times (agency_key, trip_id, stop_id, stop_sequence)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for st in &feed.stop_times {
                stmt.execute(params![agency_key, st.trip_id, st.stop_id, st.stop_sequence])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO gtfs_shapes (agency_key, shape_id, shape_pt_lat, shape_pt_lon, shape_pt_sequence)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for sh in &feed.shapes {
                stmt.execute(params![
                    agency_key,
                    sh.shape_id,
                    sh.shape_pt_lat,
                    sh.shape_pt_lon,
                    sh.shape_pt_sequence,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn routes(&self) -> Result<Vec<Route>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT route_id, agency_id, route_short_name, route_long_name, route_type
             FROM gtfs_routes ORDER BY route_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Route {
                route_id: row.get(0)?,
                agency_id: row.get(1)?,
                route_short_name: row.get(2)?,
                route_long_name: row.get(3)?,
                route_type: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn trips(&self, filter: &TripFilter) -> Result<Vec<Trip>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT trip_id, route_id, service_id, trip_headsign, direction_id, shape_id
             FROM gtfs_trips
             WHERE (?1 IS NULL OR route_id = ?1)
               AND (?2 IS NULL OR direction_id = ?2)
             ORDER BY trip_id",
        )?;
        let rows = stmt.query_map(
            params![filter.route_id, filter.direction_id],
            |row| {
                Ok(Trip {
                    trip_id: row.get(0)?,
                    route_id: row.get(1)?,
                    service_id: row.get(2)?,
                    trip_headsign: row.get(3)?,
                    direction_id: row.get(4)?,
                    shape_id: row.get(5)?,
                })
            },
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn stops(
        &self,
        route_id: Option<&str>,
        direction_id: Option<i64>,
    ) -> Result<Vec<Stop>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT s.stop_id, s.stop_code, s.stop_name, s.stop_lat, s.stop_lon, s.parent_station
             FROM gtfs_stops s
             WHERE ?1 IS NULL OR s.stop_id IN (
                 SELECT st.stop_id
                 FROM gtfs_stop_times st
                 JOIN gtfs_trips t ON t.trip_id = st.trip_id
                 WHERE t.route_id = ?1 AND (?2 IS NULL OR t.direction_id = ?2))
             ORDER BY s.stop_id",
        )?;
        let rows = stmt.query_map(params![route_id, direction_id], |row| {
            Ok(Stop {
                stop_id: row.get(0)?,
                stop_code: row.get(1)?,
                stop_name: row.get(2)?,
                stop_lat: row.get(3)?,
                stop_lon: row.get(4)?,
                parent_station: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn shape_lines(
        &self,
        route_id: Option<&str>,
        direction_id: Option<i64>,
    ) -> Result<Vec<ShapeLine>, Error> {
        let mut stmt = self.conn.prepare(
            "SELECT shape_id, shape_pt_lat, shape_pt_lon
             FROM gtfs_shapes
             WHERE ?1 IS NULL OR shape_id IN (
                 SELECT shape_id FROM gtfs_trips
                 WHERE route_id = ?1 AND (?2 IS NULL OR direction_id = ?2)
                   AND shape_id IS NOT NULL)
             ORDER BY shape_id, shape_pt_sequence",
        )?;
        let rows = stmt.query_map(params![route_id, direction_id], |row| {
            Ok((
                row.get::<usize, String>(0)?,
                row.get::<usize, f64>(1)?,
                row.get::<usize, f64>(2)?,
            ))
        })?;

        let mut lines: Vec<ShapeLine> = Vec::new();
        for row in rows {
            let (shape_id, lat, lon) = row?;
            match lines.last_mut() {
                Some(line) if line.shape_id == shape_id => line.points.push((lon, lat)),
                _ => lines.push(ShapeLine {
                    shape_id,
                    points: vec![(lon, lat)],
                }),
            }
        }
        Ok(lines)
    }
}

/// One parsed feed, ready to be loaded into the store.
struct Feed {
    routes: Vec<Route>,
    trips: Vec<Trip>,
    stops: Vec<Stop>,
    stop_times: Vec<StopTime>,
    shapes: Vec<Shape>,
}

impl Feed {
    fn from_path(path: &Path) -> Result<Feed, Error> {
        if path.is_dir() {
            Feed::from_dir(path)
        } else if path.is_file() {
            Feed::from_zip(path)
        } else {
            Err(Error::NotFileNorDirectory(format!("{}", path.display())))
        }
    }

    fn from_dir(path: &Path) -> Result<Feed, Error> {
        Ok(Feed {
            routes: read_file(path, "routes.txt")?,
            trips: read_file(path, "trips.txt")?,
            stops: read_file(path, "stops.txt")?,
            stop_times: read_file(path, "stop_times.txt")?,
            shapes: read_optional_file(path, "shapes.txt")?,
        })
    }

    fn from_zip(path: &Path) -> Result<Feed, Error> {
        let mut archive = zip::ZipArchive::new(File::open(path)?)?;
        Ok(Feed {
            routes: read_zip_entry(&mut archive, "routes.txt")?
                .ok_or_else(|| Error::MissingFile("routes.txt".to_string()))?,
            trips: read_zip_entry(&mut archive, "trips.txt")?
                .ok_or_else(|| Error::MissingFile("trips.txt".to_string()))?,
            stops: read_zip_entry(&mut archive, "stops.txt")?
                .ok_or_else(|| Error::MissingFile("stops.txt".to_string()))?,
            stop_times: read_zip_entry(&mut archive, "stop_times.txt")?
                .ok_or_else(|| Error::MissingFile("stop_times.txt".to_string()))?,
            shapes: read_zip_entry(&mut archive, "shapes.txt")?.unwrap_or_default(),
        })
    }
}

fn read_file<O>(path: &Path, file_name: &str) -> Result<Vec<O>, Error>
where
    for<'de> O: Deserialize<'de>,
{
    let p = path.join(file_name);
    if !p.exists() {
        return Err(Error::MissingFile(file_name.to_owned()));
    }
    let file = File::open(p).map_err(|e| Error::NamedFileIO {
        file_name: file_name.to_owned(),
        source: Box::new(e),
    })?;
    read_records(file, file_name)
}

fn read_optional_file<O>(path: &Path, file_name: &str) -> Result<Vec<O>, Error>
where
    for<'de> O: Deserialize<'de>,
{
    if path.join(file_name).exists() {
        read_file(path, file_name)
    } else {
        Ok(Vec::new())
    }
}

/// Find a feed file by name inside the archive, tolerating feeds zipped with
/// a top-level folder. Returns `Ok(None)` when the entry does not exist.
fn read_zip_entry<O, R>(
    archive: &mut zip::ZipArchive<R>,
    file_name: &str,
) -> Result<Option<Vec<O>>, Error>
where
    for<'de> O: Deserialize<'de>,
    R: Read + std::io::Seek,
{
    let entry_name = archive
        .file_names()
        .find(|name| *name == file_name || name.ends_with(&format!("/{}", file_name)))
        .map(String::from);
    let Some(entry_name) = entry_name else {
        return Ok(None);
    };
    let mut entry = archive.by_name(&entry_name)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).map_err(|e| Error::NamedFileIO {
        file_name: file_name.to_owned(),
        source: Box::new(e),
    })?;
    Ok(Some(read_records(std::io::Cursor::new(buf), file_name)?))
}

/// Read CSV records, skipping a UTF-8 BOM if present and trimming headers.
fn read_records<T, O>(mut reader: T, file_name: &str) -> Result<Vec<O>, Error>
where
    for<'de> O: Deserialize<'de>,
    T: Read,
{
    let mut bom = [0; 3];
    reader.read_exact(&mut bom).map_err(|e| Error::NamedFileIO {
        file_name: file_name.to_owned(),
        source: Box::new(e),
    })?;
    let chained = if bom != [0xefu8, 0xbbu8, 0xbfu8] {
        bom.chain(reader)
    } else {
        [].chain(reader)
    };

    let csv_err = |e: csv::Error| Error::CSVError {
        file_name: file_name.to_owned(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(chained);
    let headers = reader
        .headers()
        .map_err(csv_err)?
        .clone()
        .into_iter()
        .map(|h| h.trim())
        .collect::<csv::StringRecord>();

    let mut rec = csv::StringRecord::new();
    let mut objs = Vec::new();
    while reader.read_record(&mut rec).map_err(csv_err)? {
        objs.push(rec.deserialize(Some(&headers)).map_err(csv_err)?);
    }
    Ok(objs)
}
