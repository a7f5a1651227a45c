//! `ConfigLoader`: collect settings from every source, then validate once.
//!
//! Responsibilities:
//! - Hold one [`Layer`] per source and stack them in `build()`.
//! - Validate bounds and the device base URL before producing a `Config`.
//!
//! Invariants:
//! - Precedence, lowest first: profile, environment, builder methods. It does
//!   not depend on the order in which `from_profile`/`from_env` are called.
//! - `from_env` must run before `from_profile` for `ROUTEROS_PROFILE` and
//!   `ROUTEROS_CONFIG_PATH` to select the profile.
//! - `DOTENV_DISABLED` is checked before any `.env` file is read.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use super::env::read_env;
use super::error::ConfigError;
use super::layer::Layer;
use super::profile::read_profile;
use crate::constants::{
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_RETRIES, DEFAULT_OPERATION_TIMEOUT_SECS,
    DEFAULT_TIMEOUT_SECS, MAX_MAX_CONNECTIONS, MAX_MAX_RETRIES, MAX_OPERATION_TIMEOUT_SECS,
    MAX_TIMEOUT_SECS,
};
use crate::types::{Config, ConnectionConfig, Credentials, EngineConfig};

#[derive(Default)]
pub struct ConfigLoader {
    profile: Layer,
    env: Layer,
    overrides: Layer,
    profile_name: Option<String>,
    config_path: Option<PathBuf>,
    /// Requested profile that does not exist; reported only if it matters.
    profile_missing: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `.env` file from the working directory into the process
    /// environment.
    ///
    /// Skipped when `DOTENV_DISABLED` is `1` or `true`; a missing file is fine.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("1") | Some("true")
        ) {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(self),
            Err(dotenvy::Error::Io(e)) => Err(ConfigError::DotenvRead(e.kind())),
            Err(dotenvy::Error::LineParse(_, offset)) => Err(ConfigError::DotenvSyntax { offset }),
            Err(_) => Err(ConfigError::DotenvRead(std::io::ErrorKind::InvalidData)),
        }
    }

    pub fn with_profile_name(mut self, name: String) -> Self {
        self.profile_name = Some(name);
        self
    }

    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Read `ROUTEROS_*` variables. Profile name and config path from the
    /// environment are used only when not already set on the loader.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        let sources = read_env()?;
        self.env = sources.layer;
        self.profile_name = self.profile_name.or(sources.profile);
        self.config_path = self.config_path.or(sources.config_path);
        Ok(self)
    }

    /// Read the selected profile, if any.
    pub fn from_profile(mut self) -> Result<Self, ConfigError> {
        let Some(name) = self.profile_name.clone() else {
            return Ok(self);
        };
        match read_profile(self.config_path.as_deref(), &name)? {
            Some(layer) => self.profile = layer,
            None => self.profile_missing = Some(name),
        }
        Ok(self)
    }

    pub fn with_base_url(mut self, url: String) -> Self {
        self.overrides.base_url = Some(url);
        self
    }

    pub fn with_username(mut self, username: String) -> Self {
        self.overrides.username = Some(username);
        self
    }

    pub fn with_password(mut self, password: String) -> Self {
        self.overrides.password = Some(SecretString::new(password.into()));
        self
    }

    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.overrides.skip_verify = Some(skip);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.overrides.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.overrides.max_retries = Some(retries);
        self
    }

    pub fn with_max_connections(mut self, connections: usize) -> Self {
        self.overrides.max_connections = Some(connections);
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.overrides.operation_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let merged = self.profile.under(&self.env).under(&self.overrides);

        if let Some(name) = self.profile_missing
            && !merged.can_connect()
        {
            return Err(ConfigError::ProfileNotFound(name));
        }

        let base_url = normalize_base_url(merged.base_url.as_deref())?;
        let (Some(username), Some(password)) = (merged.username, merged.password) else {
            return Err(ConfigError::MissingAuth);
        };

        let connection = ConnectionConfig {
            base_url,
            skip_verify: merged.skip_verify.unwrap_or(false),
            timeout: merged.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: merged.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            max_connections: merged.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
        };
        let engine = EngineConfig {
            operation_timeout: merged
                .operation_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS)),
        };

        within("timeout", connection.timeout.as_secs(), 1..=MAX_TIMEOUT_SECS)?;
        within("max_retries", connection.max_retries as u64, 0..=MAX_MAX_RETRIES as u64)?;
        within(
            "max_connections",
            connection.max_connections as u64,
            1..=MAX_MAX_CONNECTIONS as u64,
        )?;
        within(
            "operation_timeout",
            engine.operation_timeout.as_secs(),
            1..=MAX_OPERATION_TIMEOUT_SECS,
        )?;

        Ok(Config {
            connection,
            credentials: Credentials::new(username, password),
            engine,
        })
    }
}

fn within(setting: &'static str, value: u64, range: RangeInclusive<u64>) -> Result<(), ConfigError> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::OutOfRange {
        setting,
        value,
        min: *range.start(),
        max: *range.end(),
    })
}

/// Absolute http(s) URL with a host, trailing slash removed. Blank is missing.
fn normalize_base_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(ConfigError::MissingBaseUrl);
    };
    let invalid = |message: String| ConfigError::InvalidValue {
        var: "base_url".into(),
        message,
    };

    let parsed = url::Url::parse(raw)
        .map_err(|e| invalid(format!("{e}; expected e.g. https://192.168.88.1")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "scheme must be http or https, got: {}",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("host is required (e.g. https://192.168.88.1)".into()));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
