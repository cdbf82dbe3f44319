//! Error types for daisy-extract operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting a DAISY book.
///
/// Every variant is terminal for a run; nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// The input directory is missing or is not a directory.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The encoding label given by the operator is not known.
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// No navigation file, or no usable timing documents.
    #[error("Not a DAISY 2.02 book: {0}")]
    NotADaisyBook(String),

    /// A required title, author or section title is absent or blank.
    #[error("Missing metadata: {0}")]
    MetadataMissing(String),

    /// Reading, creating or copying failed for a specific path.
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error together with the path it happened at.
    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
