//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//! - Extract configuration for commands that talk to a device.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()` and `config_context`).
//!
//! Invariants:
//! - All device commands receive the process-wide cancellation token.

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::cancellation::CancellationToken;
use crate::commands;
use crate::commands::instance::Output;
use crate::config_context::ConfigCommandContext;

/// Dispatch CLI commands to their respective handlers.
pub(crate) async fn run_command(
    cli: Cli,
    config: ConfigCommandContext,
    cancel_token: &CancellationToken,
) -> Result<()> {
    let output = Output {
        format: &cli.output,
        file: cli.output_file.clone(),
    };

    match cli.command {
        Commands::Resources => commands::resources::run_resources(output.format, output.file),
        Commands::Schema { resource } => {
            commands::resources::run_schema(&resource, output.format, output.file)
        }
        Commands::Create { resource, desired } => {
            let (config, metrics) = config.into_real_config()?;
            commands::instance::run_create(config, metrics, &resource, &desired, output, cancel_token)
                .await
        }
        Commands::Read { resource, id } => {
            let (config, metrics) = config.into_real_config()?;
            commands::instance::run_read(config, metrics, &resource, &id, output, cancel_token).await
        }
        Commands::Update {
            resource,
            id,
            desired,
            replace,
            dry_run,
        } => {
            let (config, metrics) = config.into_real_config()?;
            commands::instance::run_update(
                config,
                metrics,
                &resource,
                &id,
                &desired,
                replace,
                dry_run,
                output,
                cancel_token,
            )
            .await
        }
        Commands::Delete { resource, id } => {
            let (config, metrics) = config.into_real_config()?;
            commands::instance::run_delete(config, metrics, &resource, &id, cancel_token).await
        }
        Commands::Import { resource, token } => {
            let (config, metrics) = config.into_real_config()?;
            commands::instance::run_import(config, metrics, &resource, &token, output, cancel_token)
                .await
        }
    }
}
