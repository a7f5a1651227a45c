//! Centralized constants for the RouterOS reconciler workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed connection timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for failed requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Maximum allowed value for `max_retries`.
pub const MAX_MAX_RETRIES: usize = 10;

/// Default number of concurrent requests allowed against one device.
///
/// RouterOS serves REST requests from a small worker pool; a handful of
/// in-flight requests keeps the device responsive.
pub const DEFAULT_MAX_CONNECTIONS: usize = 4;

/// Maximum allowed value for `max_connections`.
pub const MAX_MAX_CONNECTIONS: usize = 64;

// =============================================================================
// Engine Defaults
// =============================================================================

/// Default per-operation timeout for a reconciliation call, in seconds.
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 60;

/// Maximum allowed per-operation timeout in seconds.
pub const MAX_OPERATION_TIMEOUT_SECS: u64 = 3600;

// =============================================================================
// Environment variable names
// =============================================================================

pub const ENV_BASE_URL: &str = "ROUTEROS_BASE_URL";
pub const ENV_USERNAME: &str = "ROUTEROS_USERNAME";
pub const ENV_PASSWORD: &str = "ROUTEROS_PASSWORD";
pub const ENV_SKIP_VERIFY: &str = "ROUTEROS_SKIP_VERIFY";
pub const ENV_TIMEOUT: &str = "ROUTEROS_TIMEOUT";
pub const ENV_MAX_RETRIES: &str = "ROUTEROS_MAX_RETRIES";
pub const ENV_MAX_CONNECTIONS: &str = "ROUTEROS_MAX_CONNECTIONS";
pub const ENV_OPERATION_TIMEOUT: &str = "ROUTEROS_OPERATION_TIMEOUT";
pub const ENV_PROFILE: &str = "ROUTEROS_PROFILE";
pub const ENV_CONFIG_PATH: &str = "ROUTEROS_CONFIG_PATH";
