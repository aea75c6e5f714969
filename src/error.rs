//! Error types for leetdown operations.
//!
//! Conversion itself never fails: image problems are recorded per image
//! (see [`crate::markdown::FetchError`]). These errors come from the edges,
//! reading inputs and parsing arguments.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
