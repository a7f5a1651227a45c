//! Per-attempt instrumentation of REST calls.
//!
//! Every attempt against the device is labelled with the RouterOS menu it
//! addresses (`/ip/pool`, never `/ip/pool/*7`) and the HTTP method. Retries
//! and terminal failures are counted separately so a flapping router shows up
//! as retries rather than failures.
//!
//! Does NOT handle exposition; see [`crate::metrics_exporter`]. Without an
//! installed recorder every call here is a no-op of the `metrics` facade.

use std::time::Duration;

use crate::error::ClientError;

pub const ATTEMPT_DURATION: &str = "routeros_rest_attempt_duration_seconds";
pub const ATTEMPTS_TOTAL: &str = "routeros_rest_attempts_total";
pub const RETRIES_TOTAL: &str = "routeros_rest_retries_total";
pub const FAILURES_TOTAL: &str = "routeros_rest_failures_total";

/// Coarse reason a call failed, used as the `kind` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 401/403 or missing credentials.
    Auth,
    /// 404: the menu or item does not exist.
    Missing,
    /// 429 from the device or a proxy in front of it.
    Throttled,
    /// Any other 4xx; the device refused the property bag.
    Rejected,
    /// 5xx; the REST service is down or restarting.
    Unavailable,
    Timeout,
    Tls,
    /// Connection-level failure before any response.
    Transport,
    /// A response arrived but was not the JSON shape RouterOS sends.
    Protocol,
    Other,
}

impl FailureKind {
    pub const fn label(self) -> &'static str {
        match self {
            FailureKind::Auth => "auth",
            FailureKind::Missing => "missing",
            FailureKind::Throttled => "throttled",
            FailureKind::Rejected => "rejected",
            FailureKind::Unavailable => "unavailable",
            FailureKind::Timeout => "timeout",
            FailureKind::Tls => "tls",
            FailureKind::Transport => "transport",
            FailureKind::Protocol => "protocol",
            FailureKind::Other => "other",
        }
    }

    fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => FailureKind::Auth,
            404 => FailureKind::Missing,
            429 => FailureKind::Throttled,
            400..=499 => FailureKind::Rejected,
            500..=599 => FailureKind::Unavailable,
            _ => FailureKind::Protocol,
        }
    }
}

impl From<&ClientError> for FailureKind {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::AuthFailed(_) | ClientError::Unauthorized(_) | ClientError::Forbidden(_) => {
                FailureKind::Auth
            }
            ClientError::NotFound(_) => FailureKind::Missing,
            ClientError::RateLimited(_) => FailureKind::Throttled,
            ClientError::ApiError { status, .. } => FailureKind::from_status(*status),
            ClientError::Timeout(_) => FailureKind::Timeout,
            ClientError::TlsError(_) => FailureKind::Tls,
            ClientError::ConnectionRefused(_) | ClientError::HttpError(_) => FailureKind::Transport,
            ClientError::InvalidResponse(_) => FailureKind::Protocol,
            ClientError::MaxRetriesExceeded(_, last) => FailureKind::from(last.as_ref()),
            ClientError::InvalidUrl(_) | ClientError::PoolClosed => FailureKind::Other,
        }
    }
}

/// Labels shared by every sample of one call.
#[derive(Debug, Clone, Copy)]
pub struct MenuCall<'a> {
    /// Menu path without an item id.
    pub menu: &'a str,
    pub method: &'a str,
}

impl<'a> MenuCall<'a> {
    pub fn new(menu: &'a str, method: &'a str) -> Self {
        Self { menu, method }
    }
}

/// Records call samples through the `metrics` macros.
///
/// The default collector is switched off, so a client built without
/// `--metrics-bind` never touches the facade.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// One attempt is about to be sent.
    pub fn attempt_started(&self, call: MenuCall<'_>) {
        if !self.enabled {
            return;
        }
        metrics::counter!(ATTEMPTS_TOTAL,
            "menu" => call.menu.to_string(),
            "method" => call.method.to_string(),
        )
        .increment(1);
    }

    /// One attempt finished; `status` is `None` when no response arrived.
    pub fn attempt_finished(&self, call: MenuCall<'_>, elapsed: Duration, status: Option<u16>) {
        if !self.enabled {
            return;
        }
        let status = status.map_or_else(|| "none".to_string(), |s| s.to_string());
        metrics::histogram!(ATTEMPT_DURATION,
            "menu" => call.menu.to_string(),
            "method" => call.method.to_string(),
            "status" => status,
        )
        .record(elapsed.as_secs_f64());
    }

    /// A transient failure is about to be retried. `retry` starts at 1.
    pub fn retrying(&self, call: MenuCall<'_>, retry: usize) {
        if !self.enabled {
            return;
        }
        metrics::counter!(RETRIES_TOTAL,
            "menu" => call.menu.to_string(),
            "method" => call.method.to_string(),
            "retry" => retry.to_string(),
        )
        .increment(1);
    }

    /// The call as a whole failed with `error`.
    pub fn failed(&self, call: MenuCall<'_>, error: &ClientError) {
        if !self.enabled {
            return;
        }
        metrics::counter!(FAILURES_TOTAL,
            "menu" => call.menu.to_string(),
            "method" => call.method.to_string(),
            "kind" => FailureKind::from(error).label(),
        )
        .increment(1);
    }
}
