//! Error types for the Monalisa client library.

/// All errors that can occur when using the Monalisa client.
#[derive(Debug, thiserror::Error)]
pub enum MonalisaError {
    /// The backend rejected the login attempt.
    #[error("authentication failed (HTTP {status}): {message}")]
    Auth {
        /// HTTP status code of the rejected login.
        status: u16,
        /// Message derived from the response body or status code.
        message: String,
    },

    /// The backend returned a non-success status.
    #[error("request failed (HTTP {status}): {message}")]
    Request {
        /// HTTP status code.
        status: u16,
        /// The `detail` field of the error body, or `HTTP <status>`.
        message: String,
    },

    /// A successful response carried a body that is not the expected JSON.
    #[error("response decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// A request body could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport-level HTTP failure (connection, TLS, body read).
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The session token or a caller-supplied header is not a valid
    /// header value.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The configured base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Key-value storage backend failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),

    /// Environment configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl MonalisaError {
    /// Returns the HTTP status code for errors that carry one.
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match *self {
            Self::Auth { status, .. } | Self::Request { status, .. } => Some(status),
            Self::Decode(_)
            | Self::Serialization(_)
            | Self::InvalidBaseUrl(_)
            | Self::Storage(_)
            | Self::Config(_) => None,
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Http(_) | Self::InvalidHeader(_) => None,
        }
    }

    /// Returns the human-readable message reported by the backend, if this
    /// error came from a non-success response.
    #[inline]
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match *self {
            Self::Auth { ref message, .. } | Self::Request { ref message, .. } => Some(message),
            Self::Decode(_)
            | Self::Serialization(_)
            | Self::InvalidBaseUrl(_)
            | Self::Storage(_)
            | Self::Config(_) => None,
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Http(_) | Self::InvalidHeader(_) => None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, MonalisaError>;
