use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No entry of `outputFormat` matched a recognized format
    #[error("Invalid `outputFormat`={0:?} supplied in config")]
    InvalidOutputFormat(Vec<String>),
    /// `outputType` is neither `agency` nor `route`
    #[error("Invalid `outputType`={0} supplied in config")]
    InvalidOutputType(String),
    /// The configuration names no agencies to process
    #[error("No agencies supplied in config")]
    NoAgencies,
    #[error(transparent)]
    Store(#[from] crate::gtfs::error::Error),
    #[error(transparent)]
    Format(#[from] crate::formats::error::Error),
}
