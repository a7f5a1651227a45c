//! Resolved runtime configuration.
//!
//! A [`Config`] is what the loader hands to the client and the engine once
//! every source has been merged and validated. It is never written back to
//! disk; the persisted form is [`crate::ProfileConfig`].

use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_RETRIES, DEFAULT_OPERATION_TIMEOUT_SECS,
    DEFAULT_TIMEOUT_SECS,
};
use crate::types::auth::Credentials;

/// How to reach one RouterOS device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// `http(s)://host[:port]`, without a trailing slash or `/rest`.
    pub base_url: String,
    /// Accept any certificate (the factory `www-ssl` certificate is self-signed).
    pub skip_verify: bool,
    /// Per HTTP request.
    pub timeout: Duration,
    /// Retries after the first attempt for 429/502/503/504 and transport failures.
    pub max_retries: usize,
    /// In-flight requests allowed against the device at once.
    pub max_connections: usize,
}

impl ConnectionConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Settings for reconciliation calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound for one create/read/update/delete/import, retries included.
    pub operation_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub connection: ConnectionConfig,
    pub credentials: Credentials,
    pub engine: EngineConfig,
}

impl Config {
    /// Defaults for everything except the device and its login.
    pub fn new(base_url: String, credentials: Credentials) -> Self {
        Self {
            connection: ConnectionConfig::new(base_url),
            credentials,
            engine: EngineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn admin(password: &str) -> Credentials {
        Credentials::new("admin", SecretString::new(password.to_string().into()))
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("https://192.168.88.1".to_string(), admin("pw"));
        assert_eq!(config.connection.base_url, "https://192.168.88.1");
        assert!(!config.connection.skip_verify);
        assert_eq!(config.connection.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.connection.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(
            config.engine.operation_timeout,
            Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let config = Config::new("https://router.lan".to_string(), admin("my-secret-password"));
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("my-secret-password"));
        assert!(debug_output.contains("https://router.lan"));
    }
}
