//! Profile file access.
//!
//! Responsibilities:
//! - Resolve the standard configuration file path.
//! - Read and parse the profile file (`ConfigFile`).
//!
//! Does NOT handle:
//! - Loading environment variables (see `loader`).
//! - Writing profile files; profiles are edited by hand or by tooling.
//!
//! Invariants:
//! - Profile names are unique within a configuration file (JSON object keys).
//! - A missing `profiles` key parses as an empty profile set.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ProfileConfig;

mod path;

pub(crate) use path::default_config_path;

/// On-disk configuration file: a set of named device profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

/// Errors raised while reading the profile file.
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read and parse a profile file.
pub fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigFileError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str::<ConfigFile>(&content).map_err(|e| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
