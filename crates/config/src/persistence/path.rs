//! Path helpers for configuration file locations.
//!
//! Uses the `directories` crate for platform-appropriate paths.

use std::path::PathBuf;

use anyhow::Context;

/// Returns the default path to the configuration file.
///
/// - Linux/macOS: `~/.config/routeros-reconcile/config.json`
/// - Windows: `%AppData%\routeros-reconcile\config.json`
pub(crate) fn default_config_path() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", "routeros-reconcile")
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path_ends_with_config_json() {
        let actual = default_config_path().unwrap();
        assert!(actual.ends_with("config.json"));
        assert!(actual.to_string_lossy().contains("routeros-reconcile"));
    }
}
