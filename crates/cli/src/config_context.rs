//! Configuration context for command execution.
//!
//! Responsibilities:
//! - Distinguish between commands that talk to a device and offline commands.
//! - Provide type-safe extraction of config for commands that need it.
//!
//! Does NOT handle:
//! - Configuration loading (done in `main()`).
//! - CLI argument definitions (see `args` module).
//!
//! Invariants:
//! - Offline contexts cannot be used to build a device client.
//! - Real configs are validated before command execution.

use routeros_config::Config;

/// Context for command execution.
pub(crate) enum ConfigCommandContext {
    /// A validated config loaded from profiles/environment/CLI args, plus
    /// whether request metrics should be recorded.
    Real(Box<Config>, bool),
    /// Commands that only inspect the built-in registry.
    Offline,
}

impl ConfigCommandContext {
    /// Extract the real config and the metrics flag, failing if this is offline.
    pub(crate) fn into_real_config(self) -> anyhow::Result<(Config, bool)> {
        match self {
            ConfigCommandContext::Real(config, metrics) => Ok((*config, metrics)),
            ConfigCommandContext::Offline => {
                anyhow::bail!(
                    "Internal error: attempted to use offline context for an operation requiring connection details"
                )
            }
        }
    }
}
