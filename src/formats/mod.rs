pub mod convex;
pub mod envelope;
pub mod error;
pub mod geo_util;
pub mod geojson;
pub mod lines;
pub mod lines_and_stops;
pub mod lines_buffer;
pub mod lines_dissolved;
pub mod stops;
pub mod stops_buffer;
pub mod stops_dissolved;

use crate::gtfs::store::TransitStore;
use crate::pipeline::config::Config;

use serde_json::Value;

/// The geometric representations this tool can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Envelope,
    Convex,
    LinesAndStops,
    Lines,
    LinesBuffer,
    LinesDissolved,
    Stops,
    StopsBuffer,
    StopsDissolved,
}

impl OutputFormat {
    /// Fixed invocation order, so Output Map assembly is deterministic
    /// regardless of which generator finishes first.
    pub const ALL: [OutputFormat; 9] = [
        OutputFormat::Envelope,
        OutputFormat::Convex,
        OutputFormat::LinesAndStops,
        OutputFormat::Lines,
        OutputFormat::LinesBuffer,
        OutputFormat::LinesDissolved,
        OutputFormat::Stops,
        OutputFormat::StopsBuffer,
        OutputFormat::StopsDissolved,
    ];

    /// Wire name used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Envelope => "envelope",
            OutputFormat::Convex => "convex",
            OutputFormat::LinesAndStops => "lines-and-stops",
            OutputFormat::Lines => "lines",
            OutputFormat::LinesBuffer => "lines-buffer",
            OutputFormat::LinesDissolved => "lines-dissolved",
            OutputFormat::Stops => "stops",
            OutputFormat::StopsBuffer => "stops-buffer",
            OutputFormat::StopsDissolved => "stops-dissolved",
        }
    }

    /// camelCase key under which this format's GeoJSON is returned.
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Envelope => "envelope",
            OutputFormat::Convex => "convex",
            OutputFormat::LinesAndStops => "linesAndStops",
            OutputFormat::Lines => "lines",
            OutputFormat::LinesBuffer => "linesBuffer",
            OutputFormat::LinesDissolved => "linesDissolved",
            OutputFormat::Stops => "stops",
            OutputFormat::StopsBuffer => "stopsBuffer",
            OutputFormat::StopsDissolved => "stopsDissolved",
        }
    }
}

/// Invoke the generator for one format against the given scope.
pub async fn generate(
    format: OutputFormat,
    store: &dyn TransitStore,
    config: &Config,
    route_id: Option<&str>,
    direction_id: Option<i64>,
) -> Result<Value, error::Error> {
    match format {
        OutputFormat::Envelope => envelope::geojson(store, config, route_id, direction_id).await,
        OutputFormat::Convex => convex::geojson(store, config, route_id, direction_id).await,
        OutputFormat::LinesAndStops => {
            lines_and_stops::geojson(store, config, route_id, direction_id).await
        }
        OutputFormat::Lines => lines::geojson(store, config, route_id, direction_id).await,
        OutputFormat::LinesBuffer => {
            lines_buffer::geojson(store, config, route_id, direction_id).await
        }
        OutputFormat::LinesDissolved => {
            lines_dissolved::geojson(store, config, route_id, direction_id).await
        }
        OutputFormat::Stops => stops::geojson(store, config, route_id, direction_id).await,
        OutputFormat::StopsBuffer => {
            stops_buffer::geojson(store, config, route_id, direction_id).await
        }
        OutputFormat::StopsDissolved => {
            stops_dissolved::geojson(store, config, route_id, direction_id).await
        }
    }
}
