//! `ROUTEROS_*` environment variables.
//!
//! Blank values count as unset and surrounding whitespace is trimmed. A value
//! that does not parse is an error naming the variable, never silently
//! ignored.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use super::error::ConfigError;
use super::layer::Layer;
use crate::constants::{
    ENV_BASE_URL, ENV_CONFIG_PATH, ENV_MAX_CONNECTIONS, ENV_MAX_RETRIES, ENV_OPERATION_TIMEOUT,
    ENV_PASSWORD, ENV_PROFILE, ENV_SKIP_VERIFY, ENV_TIMEOUT, ENV_USERNAME,
};

/// Trimmed value of `key`, or `None` when unset or blank.
pub fn env_var_or_none(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parsed<T: FromStr>(key: &str, expected: &str) -> Result<Option<T>, ConfigError> {
    let Some(raw) = env_var_or_none(key) else {
        return Ok(None);
    };
    raw.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
        var: key.to_string(),
        message: format!("expected {expected}, got '{raw}'"),
    })
}

fn seconds(key: &str) -> Result<Option<Duration>, ConfigError> {
    Ok(parsed::<u64>(key, "a whole number of seconds")?.map(Duration::from_secs))
}

/// What the environment contributes: settings plus profile selection.
pub(crate) struct EnvSources {
    pub layer: Layer,
    pub profile: Option<String>,
    pub config_path: Option<PathBuf>,
}

pub(crate) fn read_env() -> Result<EnvSources, ConfigError> {
    let layer = Layer {
        base_url: env_var_or_none(ENV_BASE_URL),
        username: env_var_or_none(ENV_USERNAME),
        password: env_var_or_none(ENV_PASSWORD).map(|p| SecretString::new(p.into())),
        skip_verify: parsed(ENV_SKIP_VERIFY, "true or false")?,
        timeout: seconds(ENV_TIMEOUT)?,
        max_retries: parsed(ENV_MAX_RETRIES, "a non-negative integer")?,
        max_connections: parsed(ENV_MAX_CONNECTIONS, "a positive integer")?,
        operation_timeout: seconds(ENV_OPERATION_TIMEOUT)?,
    };
    Ok(EnvSources {
        layer,
        profile: env_var_or_none(ENV_PROFILE),
        config_path: env_var_or_none(ENV_CONFIG_PATH).map(PathBuf::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_blank_values_are_unset() {
        let key = "_ROUTEROS_TEST_UNSET_VAR";
        assert!(env_var_or_none(key).is_none());

        temp_env::with_vars([(key, Some(""))], || {
            assert!(env_var_or_none(key).is_none());
        });
        temp_env::with_vars([(key, Some("   "))], || {
            assert!(env_var_or_none(key).is_none());
        });
        temp_env::with_vars([(key, Some(" value "))], || {
            assert_eq!(env_var_or_none(key), Some("value".to_string()));
        });
    }

    #[test]
    #[serial]
    fn test_read_env_layer() {
        temp_env::with_vars(
            [
                (ENV_BASE_URL, Some("https://10.0.0.1")),
                (ENV_PASSWORD, Some("pw")),
                (ENV_OPERATION_TIMEOUT, Some(" 15 ")),
                (ENV_PROFILE, Some("edge")),
                (ENV_USERNAME, None),
            ],
            || {
                let sources = read_env().unwrap();
                assert_eq!(sources.layer.base_url.as_deref(), Some("https://10.0.0.1"));
                assert!(sources.layer.username.is_none());
                assert_eq!(sources.layer.password.unwrap().expose_secret(), "pw");
                assert_eq!(sources.layer.operation_timeout, Some(Duration::from_secs(15)));
                assert_eq!(sources.profile.as_deref(), Some("edge"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_unparseable_value_names_variable() {
        temp_env::with_vars([(ENV_MAX_RETRIES, Some("many"))], || {
            let err = read_env().err().unwrap();
            assert_eq!(
                err.to_string(),
                "Invalid value for ROUTEROS_MAX_RETRIES: expected a non-negative integer, got 'many'"
            );
        });
    }
}
