//! Shared test utilities for routeros-cli integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Provide canned device responses for mock servers.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper are hermetic by default.
//! - Credentials are set to dummy values and retries are disabled so error
//!   responses surface after one request.

#![allow(dead_code)]

use assert_cmd::Command;

pub const COLLECTION: &str = "/rest/routing/bgp/template";

#[allow(unused_imports)]
pub use routeros_client::testing::load_fixture;

/// Returns a hermetic `routeros-cli` command for integration testing.
pub fn routeros_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("routeros-cli");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env("ROUTEROS_USERNAME", "admin")
        .env("ROUTEROS_PASSWORD", "test-pw")
        .env("ROUTEROS_MAX_RETRIES", "0");

    // Clear potential host leakage
    cmd.env_remove("ROUTEROS_BASE_URL")
        .env_remove("ROUTEROS_PROFILE")
        .env_remove("ROUTEROS_CONFIG_PATH")
        .env_remove("ROUTEROS_TIMEOUT")
        .env_remove("ROUTEROS_MAX_CONNECTIONS")
        .env_remove("ROUTEROS_OPERATION_TIMEOUT")
        .env_remove("ROUTEROS_SKIP_VERIFY")
        .env_remove("RUST_LOG");

    cmd
}

/// Returns a hermetic `routeros-cli` command pointed at `base_url`.
pub fn routeros_cmd_with_base_url(base_url: &str) -> Command {
    let mut cmd = routeros_cmd();
    cmd.env("ROUTEROS_BASE_URL", base_url);
    cmd
}

/// Device-style error body.
pub fn device_error(status: u16, message: &str) -> serde_json::Value {
    serde_json::json!({ "error": status, "message": message })
}
