use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The requested scope has no geometry to derive an output from
    #[error("no geometry found for the requested scope")]
    NoGeometry,
    #[error(transparent)]
    Store(#[from] crate::gtfs::error::Error),
}
