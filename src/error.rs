//! Error types for the caption service.

use thiserror::Error;

/// Errors that can occur while resolving an image source or calling the
/// captioning API.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// The source string matched no recognized image reference format.
    #[error("Unsupported image source format: {input}")]
    UnsupportedFormat {
        /// The offending source string.
        input: String,
    },

    /// A remote image fetch returned a non-success HTTP status.
    #[error("Image fetch failed with status {status}: {url}")]
    FetchFailed {
        /// HTTP status returned by the remote server.
        status: reqwest::StatusCode,
        /// The URL that was fetched.
        url: String,
    },

    /// The captioning API rejected the request.
    #[error("Captioning API request failed with status {status}: {body}")]
    Api {
        /// HTTP status returned by the API.
        status: reqwest::StatusCode,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// The API answered successfully but produced no caption text.
    #[error("Captioning API returned an empty response")]
    EmptyResponse,

    /// Error occurred during an HTTP request.
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// A data URI payload was not valid base64.
    #[error("Invalid base64 payload: {0}")]
    DecodeError(#[from] base64::DecodeError),

    /// Error occurred when accessing environment variables.
    #[error("Environment variable not found: {0}")]
    EnvError(#[from] std::env::VarError),

    /// Error occurred when parsing JSON.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CaptionError {
    /// Creates an `UnsupportedFormat` error for the given source string.
    pub fn unsupported(source: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            input: source.into(),
        }
    }
}
