//! Error types

/// Errors that can occur while committing a value.
///
/// A failed commit is never surfaced to the host as an error return; the
/// field maps it to its error indicator and a diagnostic log line. The
/// variants exist so the log can distinguish a rejecting server from an
/// unreachable one.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// HTTP error response from the endpoint.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl CommitError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
