//! Configuration loading errors.
//!
//! Messages name the offending variable, setting or path. Errors from `.env`
//! parsing carry only a byte offset so a password on the bad line is never
//! echoed.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use crate::persistence::ConfigFileError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("{setting} must be between {min} and {max} (got {value})")]
    OutOfRange {
        setting: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("Base URL is required. Set ROUTEROS_BASE_URL or configure a profile.")]
    MissingBaseUrl,

    #[error(
        "Username and password are required. Set ROUTEROS_USERNAME/ROUTEROS_PASSWORD or configure a profile."
    )]
    MissingAuth,

    #[error("Profile '{0}' not found in config file")]
    ProfileNotFound(String),

    #[error("Unable to determine config directory: {0}")]
    ConfigDirUnavailable(String),

    #[error("Failed to read config file at {path}")]
    ConfigFileRead { path: PathBuf },

    #[error("Failed to parse config file at {path}")]
    ConfigFileParse { path: PathBuf },

    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error(".env file is malformed near byte {offset}; set DOTENV_DISABLED=1 to skip it")]
    DotenvSyntax { offset: usize },

    #[error("Cannot read .env file: {0}")]
    DotenvRead(ErrorKind),
}

impl From<ConfigFileError> for ConfigError {
    fn from(error: ConfigFileError) -> Self {
        match error {
            ConfigFileError::Read { path, .. } => ConfigError::ConfigFileRead { path },
            ConfigFileError::Parse { path, .. } => ConfigError::ConfigFileParse { path },
        }
    }
}
