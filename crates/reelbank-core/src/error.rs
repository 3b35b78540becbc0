//! Error types module
//!
//! All client-facing failures are unified under the [`Error`] enum. The facade
//! performs no retries and no local recovery: every error surfaces to the
//! caller immediately, carrying enough context (operation, id, name) to be
//! actionable. Server responses are mapped onto this taxonomy via
//! [`Error::from_response`] using the machine-readable code the platform
//! returns alongside the HTTP status.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing project, dataset, asset, content hash, or local file.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Name collision under the `reject` conflict policy.
    #[error("Name conflict: {0}")]
    Conflict(String),

    /// Empty or malformed arguments, including mismatched batch lengths.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested frame index is at or beyond the asset's frame count.
    #[error("Frame index out of range: {0}")]
    FrameOutOfRange(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Remote call exceeded the configured request deadline.
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Response body could not be decoded (JSON, base64, or image data).
    #[error("Decode error: {0}")]
    Decode(String),

    /// Transport-level failure (connection refused, TLS, DNS).
    #[error("Transport error: {0}")]
    Http(String),

    /// Any server error not covered by a dedicated variant.
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

/// Result type for all facade operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Machine-readable error code, mirroring what the platform reports.
    pub fn error_code(&self) -> &str {
        match self {
            Error::NotFound(_) => "NOT_FOUND",
            Error::Conflict(_) => "NAME_CONFLICT",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::FrameOutOfRange(_) => "FRAME_OUT_OF_RANGE",
            Error::Unauthorized(_) => "UNAUTHORIZED",
            Error::Timeout(_) => "TIMEOUT",
            Error::Io(_) => "IO_ERROR",
            Error::Decode(_) => "DECODE_ERROR",
            Error::Http(_) => "TRANSPORT_ERROR",
            Error::Api { code, .. } => code,
        }
    }

    /// Map a non-success server response onto the taxonomy.
    ///
    /// The platform returns `{ "code": ..., "message": ... }` bodies; the code
    /// takes precedence over the raw status so proxies that rewrite statuses
    /// do not change the error class.
    pub fn from_response(status: u16, code: Option<&str>, message: String) -> Self {
        match (code, status) {
            (Some("NOT_FOUND"), _) | (None, 404) => Error::NotFound(message),
            (Some("NAME_CONFLICT"), _) | (None, 409) => Error::Conflict(message),
            (Some("INVALID_INPUT"), _) | (None, 400) => Error::InvalidInput(message),
            (Some("FRAME_OUT_OF_RANGE"), _) | (None, 416) => Error::FrameOutOfRange(message),
            (Some("UNAUTHORIZED"), _) | (None, 401) => Error::Unauthorized(message),
            (code, status) => Error::Api {
                status,
                code: code.unwrap_or("API_ERROR").to_string(),
                message,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Error::InvalidInput(format!("UUID parsing error: {}", err))
    }
}
