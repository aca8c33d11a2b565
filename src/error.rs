//! Error types for tether.
//!
//! All fallible operations in the crate return [`TetherError`]. Transport
//! failures are split into connectivity-level errors (the device cannot
//! reach the service) and everything else, because only connectivity
//! failures are eligible for offline queueing.

use thiserror::Error;

/// Errors that can occur during tether operations.
#[derive(Debug, Error)]
pub enum TetherError {
    /// Configuration file errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local storage errors.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Connectivity-level transport failures (offline, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client errors that are not connectivity-related.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success responses from the service.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// JSON serialization/deserialization errors.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid credentials.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// API misuse by calling code.
    #[error("Usage error: {0}")]
    Usage(String),

    /// Operation not supported.
    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl TetherError {
    /// Whether this error means the device cannot currently reach the service.
    ///
    /// Connectivity failures are the only errors the offline queue ever
    /// intercepts; everything else propagates to the caller unchanged.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Classify a transport error, folding connectivity-level failures into
    /// [`TetherError::Network`].
    #[must_use]
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || is_network_message(&err.to_string()) {
            Self::Network(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

/// Heuristic check for network-level error messages the client library does
/// not expose through a dedicated predicate.
fn is_network_message(error: &str) -> bool {
    let network_patterns = [
        "dns error",
        "connection refused",
        "connection reset",
        "network unreachable",
        "no route to host",
        "network is down",
    ];
    let lower = error.to_lowercase();
    network_patterns.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_connectivity() {
        let err = TetherError::Network("connect error".to_string());
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_api_errors_are_not_connectivity() {
        let err = TetherError::Api {
            status: 500,
            message: "internal error".to_string(),
        };
        assert!(!err.is_connectivity());
        assert_eq!(err.to_string(), "API error (500): internal error");
    }

    #[test]
    fn test_network_message_patterns() {
        assert!(is_network_message("tcp connect error: Connection refused"));
        assert!(is_network_message("DNS error: no records found"));
        assert!(!is_network_message("invalid header value"));
    }
}
