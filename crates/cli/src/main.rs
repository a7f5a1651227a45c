//! RouterOS CLI - reconcile RouterOS configuration objects from the command line.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Drive create/read/update/delete/import through the reconciliation engine.
//! - Format and display results (table, JSON, YAML).
//!
//! Does NOT handle:
//! - Reconciliation logic (see `crates/engine`) or the REST transport (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing to allow `.env` to provide clap defaults.
//! - Global options (like `--base-url`) are applied consistently across all subcommands.
//! - Logs go to stderr; stdout carries only command output.

mod args;
mod cancellation;
mod commands;
mod config_context;
mod dispatch;
mod error;
mod formatters;

use args::Cli;
use cancellation::{CancellationToken, is_cancelled_error, print_cancelled_message};
use clap::Parser;
use config_context::ConfigCommandContext;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use routeros_config::{Config, ConfigLoader};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn exit_with(message: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {:#}", message, err);
    std::process::exit(ExitCode::GeneralError.as_i32());
}

/// Merge profile, environment and command-line settings.
fn load_config(cli: &Cli) -> Config {
    let mut loader = ConfigLoader::new();

    // Blank/whitespace-only values are ignored to allow fallback to env var
    if let Some(ref path) = cli.config_path
        && !path.to_string_lossy().trim().is_empty()
    {
        loader = loader.with_config_path(path.clone());
    }

    if let Some(ref profile_name) = cli.profile {
        loader = loader.with_profile_name(profile_name.clone());
    }

    // Env first so ROUTEROS_PROFILE/ROUTEROS_CONFIG_PATH can select the profile.
    loader = loader
        .from_env()
        .unwrap_or_else(|e| exit_with("Failed to load configuration from environment", e));
    loader = loader
        .from_profile()
        .unwrap_or_else(|e| exit_with("Failed to load configuration from profile", e));

    // CLI overrides (highest priority)
    if let Some(ref url) = cli.base_url {
        loader = loader.with_base_url(url.clone());
    }
    if let Some(ref username) = cli.username {
        loader = loader.with_username(username.clone());
    }
    if let Some(ref password) = cli.password {
        loader = loader.with_password(password.clone());
    }
    if let Some(timeout_secs) = cli.timeout {
        loader = loader.with_timeout(Duration::from_secs(timeout_secs));
    }
    if let Some(retries) = cli.max_retries {
        loader = loader.with_max_retries(retries);
    }
    if let Some(connections) = cli.max_connections {
        loader = loader.with_max_connections(connections);
    }
    if let Some(secs) = cli.operation_timeout {
        loader = loader.with_operation_timeout(Duration::from_secs(secs));
    }
    if cli.skip_verify {
        loader = loader.with_skip_verify(true);
    }

    loader
        .build()
        .unwrap_or_else(|e| exit_with("Failed to build configuration", e))
}

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        exit_with("Failed to load environment", e);
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(ref bind) = cli.metrics_bind
        && let Err(e) = routeros_client::metrics_exporter::install(bind)
    {
        exit_with("Failed to start metrics exporter", e);
    }

    let config_context = if cli.command.needs_device() {
        let config = load_config(&cli);
        ConfigCommandContext::Real(Box::new(config), cli.metrics_bind.is_some())
    } else {
        ConfigCommandContext::Offline
    };

    // Create cancellation token and set up signal handling
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        cancel_clone.cancel();
    });

    let exit_code = match run_command(cli, config_context, &cancel).await {
        Ok(()) => ExitCode::Success,
        Err(e) if is_cancelled_error(&e) => {
            print_cancelled_message();
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
