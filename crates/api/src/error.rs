use thiserror::Error;

use crate::parser::JsonParseError;

/// Failures surfaced by [`crate::CompositionClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("base URL must use http (TLS is not supported); got '{0}://'")]
    UnsupportedScheme(String),
    #[error("failed to build HTTP client: {0}")]
    BuildClient(#[source] reqwest::Error),
    #[error("failed to build request: {0}")]
    BuildRequest(#[source] reqwest::Error),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server responded with HTTP {status}: {body_preview}")]
    HttpStatus { status: u16, body_preview: String },
    #[error(transparent)]
    InvalidJson(#[from] JsonParseError),
    #[error("response has no string 'status' field: {body_preview}")]
    MissingStatus { body_preview: String },
}
