//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, metadata reader and JSON errors, and provides semantic
//! variants for identifier validation and USGS record conversion failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata reader error: {0}")]
    Metadata(#[from] crate::io::MetadataError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene identifier `{id}`: {reason}")]
    InvalidIdentifier { id: String, reason: String },

    #[error("Missing source file: {href}")]
    MissingSource { href: String },

    #[error("No USGS STAC records found next to {href}")]
    NoUsgsRecords { href: String },

    #[error("Asset `{key}` from {href} has no entry in the asset table")]
    UnmappedAsset { key: String, href: String },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },
}

impl Error {
    pub fn invalid_identifier<S: Into<String>>(id: &str, reason: S) -> Self {
        Error::InvalidIdentifier {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
