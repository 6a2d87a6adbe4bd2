//! Error types for the Medboard plugin.
//!
//! Two layers of errors live here. [`FetchError`] is the contract of the remote
//! data source: every list, detail or stats request either yields a payload or
//! one of its variants. [`DashboardError`] covers everything else the plugin can
//! trip over (configuration, themes, I/O) and wraps `FetchError` so callers can
//! use a single [`Result`] alias.

use thiserror::Error;

/// Failure of a single request against the remote API.
///
/// The list and detail controllers never propagate these; they are converted
/// into the `error` field of the controller snapshot and rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure: the host could not be reached or returned nothing.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("Server error: {message}")]
    Server {
        /// HTTP status code of the response.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl FetchError {
    /// Shorthand for a server error carrying only a message.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }
}

/// The main error type for Medboard operations outside the fetch path.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Configuration is invalid.
    ///
    /// Raised when a configured value (for example the API base URL) cannot be
    /// used at all. Most configuration keys silently fall back to defaults.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// A host message could not be decoded (request context, response body).
    #[error("Decode error: {0}")]
    Decode(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A remote request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A specialized `Result` type for Medboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_render_human_readable_messages() {
        assert_eq!(
            FetchError::Network("connection refused".into()).to_string(),
            "Network error: connection refused"
        );
        assert_eq!(
            FetchError::server(500, "database offline").to_string(),
            "Server error: database offline"
        );
        assert_eq!(
            FetchError::NotFound("patient 7".into()).to_string(),
            "Not found: patient 7"
        );
    }

    #[test]
    fn dashboard_error_is_transparent_over_fetch_errors() {
        let err: DashboardError = FetchError::NotFound("p-1".into()).into();
        assert_eq!(err.to_string(), "Not found: p-1");
    }
}
