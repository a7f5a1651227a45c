//! Error types for the RouterOS client.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to a RouterOS device.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Credentials were missing when building the client.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Error response from the device.
    #[error("API error ({status}) at {url}: {message}{}", .detail.as_ref().map(|d| format!(" ({d})")).unwrap_or_default())]
    ApiError {
        status: u16,
        url: String,
        message: String,
        detail: Option<String>,
    },

    /// The device answered with a body we could not interpret.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Request timed out.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Rate limited - too many requests.
    #[error("Rate limited: retry after {0:?}")]
    RateLimited(Option<Duration>),

    /// Connection refused.
    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    /// TLS/SSL error.
    #[error("TLS error: {0}")]
    TlsError(String),

    /// Maximum retries exceeded; carries the last failure.
    #[error("Maximum retries exceeded ({0} attempts): {1}")]
    MaxRetriesExceeded(usize, Box<ClientError>),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The addressed collection or item does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// HTTP 401 from the device.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 403 from the device.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The request pool was shut down while a request waited for a slot.
    #[error("Connection pool closed")]
    PoolClosed,
}

impl ClientError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(_) | Self::Timeout(_) | Self::RateLimited(_) => true,
            Self::ApiError { status, .. } => Self::is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if an HTTP status code is retryable.
    ///
    /// 429 and the transient gateway statuses (502, 503, 504) are retried.
    /// Everything else, including 500, fails immediately.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// Check if this error indicates an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthFailed(_) | Self::Unauthorized(_))
    }

    /// Check if this error means the addressed object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Unwraps `MaxRetriesExceeded` to the failure that ended the retry loop.
    pub fn root_cause(&self) -> &ClientError {
        match self {
            Self::MaxRetriesExceeded(_, inner) => inner.root_cause(),
            other => other,
        }
    }

    /// Classify a transport error, keeping timeouts, TLS and connect
    /// failures distinguishable for exit codes and metrics.
    pub(crate) fn from_transport(error: reqwest::Error, url: &str, timeout: Duration) -> Self {
        if error.is_timeout() {
            return Self::Timeout(timeout);
        }
        if error.is_connect() {
            let text = format!("{error:?}").to_lowercase();
            if text.contains("certificate") || text.contains("tls") {
                return Self::TlsError(error.to_string());
            }
            return Self::ConnectionRefused(url.to_string());
        }
        Self::HttpError(error)
    }
}
