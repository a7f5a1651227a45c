//! Named profiles from the JSON config file.
//!
//! A profile that cannot be found is not an error here; the loader only
//! reports it when the other sources fail to describe a device on their own.

use std::path::Path;
use std::time::Duration;

use super::error::ConfigError;
use super::layer::Layer;
use crate::persistence::{default_config_path, read_config_file};
use crate::types::ProfileConfig;

/// Layer for profile `name`, or `None` when the file or the profile is absent.
pub(crate) fn read_profile(path: Option<&Path>, name: &str) -> Result<Option<Layer>, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path().map_err(|e| ConfigError::ConfigDirUnavailable(e.to_string()))?,
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "Config file not found");
        return Ok(None);
    }

    let file = read_config_file(&path)?;
    file.profiles.get(name).map(layer_from).transpose()
}

fn layer_from(profile: &ProfileConfig) -> Result<Layer, ConfigError> {
    Ok(Layer {
        base_url: profile.base_url.clone(),
        username: profile.username.clone(),
        password: profile.password.as_ref().map(|p| p.resolve()).transpose()?,
        skip_verify: profile.skip_verify,
        timeout: profile.timeout_seconds.map(Duration::from_secs),
        max_retries: profile.max_retries,
        max_connections: profile.max_connections,
        operation_timeout: profile.operation_timeout_seconds.map(Duration::from_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_profile_seconds_become_durations() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"profiles": {{"edge": {{"base_url": "https://edge-1", "timeout_seconds": 12, "operation_timeout_seconds": 90}}}}}}"#
        )
        .unwrap();

        let layer = read_profile(Some(file.path()), "edge").unwrap().unwrap();
        assert_eq!(layer.base_url.as_deref(), Some("https://edge-1"));
        assert_eq!(layer.timeout, Some(Duration::from_secs(12)));
        assert_eq!(layer.operation_timeout, Some(Duration::from_secs(90)));
        assert!(layer.password.is_none());

        assert!(read_profile(Some(file.path()), "core").unwrap().is_none());
    }

    #[test]
    fn test_missing_file_is_no_profile() {
        let layer = read_profile(Some(Path::new("/nonexistent/routeros.json")), "edge").unwrap();
        assert!(layer.is_none());
    }
}
