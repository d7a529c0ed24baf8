//! Error taxonomy for the attraction service.
//!
//! Storage errors abort whatever request or merge run hit them. Network, decode,
//! transform and encode errors are per-record: the merge pipeline turns them into
//! Failure List entries and carries on with the rest of the batch.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected client input. Surfaced to the submitter as a 400.
    #[error("{0}")]
    Validation(String),

    /// A merge run found nothing to drain.
    #[error("Cache is empty")]
    EmptyCache,

    /// The cache could not be read.
    #[error("Failed to read cache: {0}")]
    Read(#[source] rusqlite::Error),

    /// The cache rejected a write (constraint violation or storage fault).
    #[error("Failed to write cache: {0}")]
    Write(#[source] rusqlite::Error),

    /// The external store could not be opened, read or written.
    #[error("External store error: {0}")]
    Storage(#[source] rusqlite::Error),

    /// Image fetch or remote delivery failed at the transport level.
    #[error("Network error: {0}")]
    Network(String),

    /// Fetched bytes are not a decodable image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Resize or crop preconditions were not met.
    #[error("Transform error: {0}")]
    Transform(String),

    /// A processed image could not be encoded or written out.
    #[error("Encode error: {0}")]
    Encode(String),

    /// A built-in validation pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
