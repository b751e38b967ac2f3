//! Upstream error definitions.

use thiserror::Error;

/// Errors from talking to the rates provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Base URL cannot carry path segments.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// Client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, DNS, or timeout failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status.
    #[error("{status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Body was not the JSON we expected.
    #[error("invalid response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl UpstreamError {
    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            UpstreamError::InvalidUrl(_) | UpstreamError::Client(_) => "client_error",
            UpstreamError::Transport { source, .. } if source.is_timeout() => "timeout",
            UpstreamError::Transport { .. } => "transport_error",
            UpstreamError::Status { .. } => "status_error",
            UpstreamError::Decode { .. } => "decode_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = UpstreamError::Status {
            url: "https://api.frankfurter.app/latest?from=XXX".into(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert_eq!(
            err.to_string(),
            "404 Not Found from https://api.frankfurter.app/latest?from=XXX"
        );
        assert_eq!(err.outcome(), "status_error");
    }
}
