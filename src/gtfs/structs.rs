use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Helper function to deserialize optional fields that might fail to parse
pub fn deserialize_opt<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: FromStr,
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => match T::from_str(&s) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Ok(None), // Instead of failing, just return None
        },
        None => Ok(None),
    }
}

/// A transportation route.
/// https://gtfs.org/documentation/schedule/reference/#routestxt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub route_id: String,
    #[serde(default)]
    pub agency_id: Option<String>,
    #[serde(default)]
    pub route_short_name: Option<String>,
    #[serde(default)]
    pub route_long_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt")]
    pub route_type: Option<i64>,
}

impl Route {
    /// Human-readable route name: short name, else long name, else the id.
    /// Whitespace is collapsed to `_` so the name is safe as an output key.
    pub fn display_name(&self) -> String {
        let name = self
            .route_short_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                self.route_long_name
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
            })
            .unwrap_or(&self.route_id);
        name.split_whitespace().collect::<Vec<_>>().join("_")
    }
}

/// A scheduled trip for a route.
/// https://gtfs.org/documentation/schedule/reference/#tripstxt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub trip_id: String,
    pub route_id: String,
    pub service_id: String,
    #[serde(default)]
    pub trip_headsign: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt")]
    pub direction_id: Option<i64>,
    #[serde(default)]
    pub shape_id: Option<String>,
}

/// A physical stop or station.
/// https://gtfs.org/documentation/schedule/reference/#stopstxt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub stop_id: String,
    #[serde(default)]
    pub stop_code: Option<String>,
    #[serde(default)]
    pub stop_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt")]
    pub stop_lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt")]
    pub stop_lon: Option<f64>,
    #[serde(default)]
    pub parent_station: Option<String>,
}

/// Scheduled stop time for a trip.
/// https://gtfs.org/documentation/schedule/reference/#stop_timestxt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: i64,
}

/// Shape points that define the path of a route.
/// https://gtfs.org/documentation/schedule/reference/#shapestxt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub shape_id: String,
    pub shape_pt_lat: f64,
    pub shape_pt_lon: f64,
    pub shape_pt_sequence: i64,
}

/// One shape reassembled into an ordered sequence of `(lon, lat)` points.
#[derive(Debug, Clone)]
pub struct ShapeLine {
    pub shape_id: String,
    pub points: Vec<(f64, f64)>,
}
