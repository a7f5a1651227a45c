//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ReconcileError` and `ClientError` variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see cancellation.rs for SIGINT handling).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use routeros_client::ClientError;
use routeros_engine::ReconcileError;

use crate::cancellation::SIGINT_EXIT_CODE;

/// Structured exit codes for routeros-cli.
///
/// These codes enable scripts to distinguish between different failure modes
/// and take appropriate action (retry, refresh credentials, fail fast, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Authentication failure - rejected credentials.
    AuthenticationFailed = 2,

    /// Connection error - network, timeout, or TLS failure.
    ///
    /// Scripts may retry with exponential backoff.
    ConnectionError = 3,

    /// The addressed item or resource type does not exist.
    NotFound = 4,

    /// Desired state rejected by the schema or by the device (HTTP 400).
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// Permission denied - the user's group lacks the required policy.
    PermissionDenied = 6,

    /// Rate limited - HTTP 429 Too Many Requests.
    RateLimited = 7,

    /// Device temporarily unavailable - HTTP 502/503/504.
    ServiceUnavailable = 8,

    /// A natural-key import matched several items.
    ///
    /// Scripts should import by `*hex` id instead.
    AmbiguousKey = 9,

    /// Interrupted - SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = SIGINT_EXIT_CODE,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::AuthFailed(_) | ClientError::Unauthorized(_) => {
                ExitCode::AuthenticationFailed
            }
            ClientError::ApiError { status: 401, .. } => ExitCode::AuthenticationFailed,

            ClientError::ConnectionRefused(_)
            | ClientError::Timeout(_)
            | ClientError::InvalidUrl(_)
            | ClientError::TlsError(_)
            | ClientError::PoolClosed => ExitCode::ConnectionError,

            ClientError::NotFound(_) => ExitCode::NotFound,
            ClientError::ApiError { status: 404, .. } => ExitCode::NotFound,

            ClientError::InvalidResponse(_) => ExitCode::ValidationError,
            ClientError::ApiError { status: 400, .. } => ExitCode::ValidationError,

            ClientError::Forbidden(_) => ExitCode::PermissionDenied,
            ClientError::ApiError { status: 403, .. } => ExitCode::PermissionDenied,

            ClientError::RateLimited(_) => ExitCode::RateLimited,
            ClientError::ApiError { status: 429, .. } => ExitCode::RateLimited,

            ClientError::ApiError {
                status: 502 | 503 | 504,
                ..
            } => ExitCode::ServiceUnavailable,

            ClientError::MaxRetriesExceeded(_, inner) => Self::from(inner.as_ref()),

            ClientError::HttpError(e) => {
                if e.is_connect() || e.is_timeout() {
                    ExitCode::ConnectionError
                } else {
                    ExitCode::GeneralError
                }
            }

            ClientError::ApiError { .. } => ExitCode::GeneralError,
        }
    }
}

impl From<&ReconcileError> for ExitCode {
    fn from(err: &ReconcileError) -> Self {
        match err {
            ReconcileError::Validation { .. } | ReconcileError::Codec { .. } => {
                ExitCode::ValidationError
            }
            ReconcileError::NotFound { .. } => ExitCode::NotFound,
            ReconcileError::AmbiguousKey { .. } => ExitCode::AmbiguousKey,
            ReconcileError::Device { source, .. } => Self::from(source),
            ReconcileError::Cancelled { .. } => ExitCode::Interrupted,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no engine or client error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<ReconcileError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(err);
            }
        }
        ExitCode::GeneralError
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use routeros_engine::{ValidationErrors, Violation};
    use std::time::Duration;

    fn api_error(status: u16) -> ClientError {
        ClientError::ApiError {
            status,
            url: "https://192.168.88.1/rest/routing/bgp/template".to_string(),
            message: "error".to_string(),
            detail: None,
        }
    }

    #[test]
    fn test_exit_code_as_i32() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::AmbiguousKey.as_i32(), 9);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_from_client_error_statuses() {
        assert_eq!(ExitCode::from(&api_error(400)), ExitCode::ValidationError);
        assert_eq!(ExitCode::from(&api_error(401)), ExitCode::AuthenticationFailed);
        assert_eq!(ExitCode::from(&api_error(403)), ExitCode::PermissionDenied);
        assert_eq!(ExitCode::from(&api_error(404)), ExitCode::NotFound);
        assert_eq!(ExitCode::from(&api_error(429)), ExitCode::RateLimited);
        assert_eq!(ExitCode::from(&api_error(503)), ExitCode::ServiceUnavailable);
        assert_eq!(ExitCode::from(&api_error(500)), ExitCode::GeneralError);
    }

    #[test]
    fn test_from_client_error_transport() {
        let err = ClientError::Timeout(Duration::from_secs(30));
        assert_eq!(ExitCode::from(&err), ExitCode::ConnectionError);
        let err = ClientError::Forbidden("policy".to_string());
        assert_eq!(ExitCode::from(&err), ExitCode::PermissionDenied);
    }

    #[test]
    fn test_from_client_error_max_retries_exceeded_nested() {
        let inner = ClientError::RateLimited(None);
        let middle = ClientError::MaxRetriesExceeded(3, Box::new(inner));
        let outer = ClientError::MaxRetriesExceeded(3, Box::new(middle));
        assert_eq!(ExitCode::from(&outer), ExitCode::RateLimited);
    }

    #[test]
    fn test_from_reconcile_error() {
        let validation = ReconcileError::Validation {
            path: "/routing/bgp/template".to_string(),
            id: None,
            errors: ValidationErrors::new(vec![Violation::missing("name")]),
        };
        assert_eq!(ExitCode::from(&validation), ExitCode::ValidationError);

        let ambiguous = ReconcileError::AmbiguousKey {
            path: "/routing/bgp/template".to_string(),
            id: Some("edge".to_string()),
            key: "name".to_string(),
            value: "edge".to_string(),
            count: 2,
        };
        assert_eq!(ExitCode::from(&ambiguous), ExitCode::AmbiguousKey);

        let device = ReconcileError::Device {
            path: "/routing/bgp/template/*1".to_string(),
            id: Some("*1".to_string()),
            source: ClientError::Unauthorized("bad password".to_string()),
        };
        assert_eq!(ExitCode::from(&device), ExitCode::AuthenticationFailed);
    }

    #[test]
    fn test_exit_code_ext_walks_context_chain() {
        let err = Err::<(), _>(ReconcileError::NotFound {
            path: "/routing/bgp/template/*9".to_string(),
            id: Some("*9".to_string()),
        })
        .context("Failed to read bgp_template *9")
        .unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::NotFound);

        let err = anyhow::anyhow!("plain failure");
        assert_eq!(err.exit_code(), ExitCode::GeneralError);
    }
}
