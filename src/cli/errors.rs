use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input must be an `_MTL.xml` or `_MTL.txt` file, got: {path}")]
    NotAnMtlFile { path: String },

    #[error("Input file does not exist: {path}")]
    MissingInput { path: String },

    #[error("Input directory does not exist: {path}")]
    MissingInputDir { path: String },

    #[error("Could not read config {path}: {source}")]
    Config {
        path: String,
        source: landsat_stac::Error,
    },

    #[error("Batch finished with {errors} failed product(s)")]
    BatchFailed { errors: usize },

    #[error(transparent)]
    Conversion(#[from] landsat_stac::Error),
}
