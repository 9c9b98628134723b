//! Errors raised while setting up the HTTP backend.

use std::fmt;

/// Errors building an [`HttpAuthBackend`](crate::HttpAuthBackend).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpSetupError {
    /// The configured base URL is not a valid absolute URL.
    InvalidBaseUrl {
        /// The configured URL.
        url: String,
        /// Error details.
        details: String,
    },
    /// The bearer token cannot be sent as a header value.
    InvalidToken,
    /// The underlying HTTP client could not be constructed.
    ClientBuild {
        /// Error details.
        details: String,
    },
}

impl fmt::Display for HttpSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl { url, details } => {
                write!(f, "invalid base URL {url}: {details}")
            }
            Self::InvalidToken => write!(f, "bearer token is not a valid header value"),
            Self::ClientBuild { details } => write!(f, "failed to build HTTP client: {details}"),
        }
    }
}

impl std::error::Error for HttpSetupError {}
