//! Error types for loading images and region catalogs.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// The image bytes could not be decoded.
    #[error("Failed to decode image '{name}': {source}")]
    ImageDecode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid UTF-8 in region catalog: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The region catalog is not valid JSON for the expected layout.
    #[error("Invalid region catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// Two regions in one catalog share an identifier.
    #[error("Duplicate region id '{0}'")]
    DuplicateRegion(String),
}

pub type Result<T> = std::result::Result<T, AnnotatorError>;
