pub mod formats;
pub mod gtfs;
pub mod pipeline;
