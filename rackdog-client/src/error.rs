//! Client error types.

use thiserror::Error;

/// Errors returned by provisioning API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response. The raw body is kept so operators see what the
    /// service said.
    #[error("{method} {url} failed: {status} - {body}")]
    Http {
        status: u16,
        method: String,
        url: String,
        body: String,
    },

    /// 2xx response whose envelope reported `success: false`.
    #[error("API error: {0}")]
    Api(String),

    /// 2xx response with a successful envelope but no payload.
    #[error("API returned no error but also no data")]
    MissingData,

    /// Connection-level failure (DNS, TLS, reset, client timeout).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The caller's deadline passed before the call completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl ClientError {
    /// HTTP status of the failed response, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the service answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
