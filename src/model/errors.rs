//! Error types for the search service and local stores

use thiserror::Error;

/// Host marker of the documented example server shipped as the default URL
pub const EXAMPLE_SERVER_MARKER: &str = "example.com";

pub const EXAMPLE_SERVER_ADVISORY: &str = "The server URL still points at the example endpoint. \
     Set the address of a real server (press S) and search again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Connection, timeout or transport failure
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body was not the expected JSON
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The placeholder endpoint is still configured
    #[error("{}", EXAMPLE_SERVER_ADVISORY)]
    MisconfiguredServer,
}

impl SearchError {
    /// Whether this failure points at the placeholder server, either by kind
    /// or by the marker showing up in the message
    pub fn is_misconfigured_server(&self) -> bool {
        match self {
            Self::MisconfiguredServer => true,
            other => other.to_string().contains(EXAMPLE_SERVER_MARKER),
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

pub fn is_example_server(url: &str) -> bool {
    url.contains(EXAMPLE_SERVER_MARKER)
}

/// Failure reading or writing a persisted store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed store file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_marker_in_message() {
        let err = SearchError::Network("dns error: example.com not found".to_string());
        assert!(err.is_misconfigured_server());

        let err = SearchError::Network("connection refused".to_string());
        assert!(!err.is_misconfigured_server());

        assert!(SearchError::MisconfiguredServer.is_misconfigured_server());
    }

    #[test]
    fn detects_placeholder_url() {
        assert!(is_example_server("https://example.com/api/echoir"));
        assert!(!is_example_server("https://music.local:8443"));
    }
}
