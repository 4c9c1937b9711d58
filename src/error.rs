//! Error types for the redline library.

use std::io;
use thiserror::Error;

/// Result type alias for redline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can surface from an extraction.
///
/// Extraction is deterministic over its input, so neither kind is worth
/// retrying without modifying the input.
#[derive(Error, Debug)]
pub enum Error {
    /// The package is missing a part every usable document must carry.
    #[error("malformed package: missing {0}")]
    MalformedPackage(String),

    /// Any other processing fault (archive corruption, XML handling),
    /// carrying the originating message.
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ExtractionFailed(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::ExtractionFailed(err.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::ExtractionFailed(err.to_string())
    }
}
