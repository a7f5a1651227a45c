//! Configuration management for the RouterOS reconciler.
//!
//! This crate provides types and loaders for managing RouterOS connection
//! configuration from environment variables, `.env` files and profile files.

pub mod constants;
mod loader;
pub mod persistence;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use persistence::{ConfigFile, ConfigFileError};
pub use types::{
    Config, ConnectionConfig, Credentials, EngineConfig, ProfileConfig, SecureValue,
};
