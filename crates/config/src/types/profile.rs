//! Profile configuration types for the RouterOS reconciler.
//!
//! Responsibilities:
//! - Define `ProfileConfig` for storing named device profiles.
//! - Support partial configuration (all fields optional) so env vars can fill gaps.
//!
//! Does NOT handle:
//! - Profile loading or merging (see `loader` module).
//!
//! Invariants:
//! - All fields are optional to allow partial profile definitions.
//! - The password uses `SecureValue` for flexible secret storage.

use crate::types::auth::SecureValue;
use serde::{Deserialize, Serialize};

/// A named device profile stored in the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Base URL of the device
    pub base_url: Option<String>,
    /// Username for the REST service
    pub username: Option<String>,
    /// Password for the REST service
    pub password: Option<SecureValue>,
    /// Whether to skip TLS verification
    pub skip_verify: Option<bool>,
    /// HTTP request timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// Maximum number of retries for failed requests
    pub max_retries: Option<usize>,
    /// Maximum number of concurrent requests against the device
    pub max_connections: Option<usize>,
    /// Upper bound for one reconciliation call, in seconds
    pub operation_timeout_seconds: Option<u64>,
}
