use thiserror::Error;

/// An error that can occur while importing or querying transit schedule data.
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory feed file is not present in the directory or archive
    #[error("Could not find file {0}")]
    MissingFile(String),
    /// The given feed path is neither a file nor a directory
    #[error("Could not read feed: {0} is neither a file nor a directory")]
    NotFileNorDirectory(String),
    /// Generic Input/Output error while reading a file
    #[error("impossible to read file")]
    IO(#[from] std::io::Error),
    /// Impossible to read a file
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The initial error that caused the unability to read the file
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Impossible to read a CSV file
    #[error("impossible to read csv file '{file_name}'")]
    CSVError {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
    },
    /// Error when trying to unzip the feed archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    /// Error when querying sqlite
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),
}
