//! Configuration type definitions for the RouterOS reconciler.
//!
//! Responsibilities:
//! - Define the resolved `Config` (connection, credentials, engine settings).
//! - Define the persisted `ProfileConfig` and its password forms.
//!
//! Does NOT handle:
//! - Configuration loading from files or environment variables (see `loader` module).
//! - Actual network connections or authentication (see client crate).
//!
//! Invariants:
//! - All secret types use `secrecy::SecretString` to prevent accidental logging.
//! - `KEYRING_SERVICE` is the canonical service name for all keyring operations.

mod auth;
pub(crate) mod connection;
mod profile;

pub use auth::{Credentials, KEYRING_SERVICE, SecureValue};
pub use connection::{Config, ConnectionConfig, EngineConfig};
pub use profile::ProfileConfig;
