use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do with the agency loop's results when more than one agency is
/// configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgencyReturnPolicy {
    /// Keep every configured agency's output, keyed by agency key.
    AggregateAll,
    /// Stop after the first agency and return only its output.
    FirstOnly,
}

/// One transit feed source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgencyConfig {
    /// Key used for logging and for scoping imports.
    pub agency_key: String,
    /// Feed location: a directory of GTFS files or a zip archive.
    pub path: PathBuf,
}

/// Generation configuration, usually read from a `config.json`.
///
/// `output_type` and `output_format` are kept as raw strings: they are
/// validated where they are consumed, so an unrecognized format entry among
/// valid ones is ignored rather than rejected up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agencies: Vec<AgencyConfig>,
    pub output_type: String,
    pub output_format: Vec<String>,
    pub buffer_size_meters: f64,
    pub skip_import: bool,
    pub verbose: bool,
    /// Consumed by the packaging layer, not by generation.
    pub zip_output: bool,
    pub agency_return_policy: AgencyReturnPolicy,
    /// Store location; `None` keeps the store in memory.
    pub sqlite_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            agencies: Vec::new(),
            output_type: "agency".to_string(),
            output_format: vec!["lines-and-stops".to_string()],
            buffer_size_meters: 400.0,
            skip_import: false,
            verbose: true,
            zip_output: false,
            agency_return_policy: AgencyReturnPolicy::AggregateAll,
            sqlite_path: None,
        }
    }
}
