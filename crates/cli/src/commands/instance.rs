//! Device commands: create, read, update, delete and import.
//!
//! Responsibilities:
//! - Turn command-line input into engine calls against the configured device.
//! - Format the resulting instance or change set.
//!
//! Does NOT handle:
//! - Reconciliation semantics (see `routeros-engine`).
//! - Parsing desired-state input (see `desired`).
//!
//! Invariants:
//! - Every engine call carries the process-wide cancellation token.
//! - `update` reads the current state first, so it works without a cached
//!   instance; `--dry-run` stops after computing the diff.

use std::path::PathBuf;

use anyhow::{Context, Result};
use routeros_config::Config;
use routeros_engine::ResourceInstance;
use tracing::info;

use super::desired::{editable, load_desired};
use super::{build_reconciler, call_options, handle};
use crate::args::DesiredArgs;
use crate::cancellation::CancellationToken;
use crate::formatters::{ChangeRow, ChangesOutput, OutputFormat, get_formatter, output_result};

/// Output settings shared by the device commands.
pub struct Output<'a> {
    pub format: &'a str,
    pub file: Option<PathBuf>,
}

impl Output<'_> {
    fn instance(&self, instance: &ResourceInstance) -> Result<()> {
        let format = OutputFormat::from_str(self.format)?;
        let output = get_formatter(format).format_instance(instance)?;
        output_result(&output, format, self.file.as_ref())
    }

    fn changes(&self, changes: &ChangesOutput) -> Result<()> {
        let format = OutputFormat::from_str(self.format)?;
        let output = get_formatter(format).format_changes(changes)?;
        output_result(&output, format, self.file.as_ref())
    }
}

pub async fn run_create(
    config: Config,
    metrics: bool,
    type_name: &str,
    desired: &DesiredArgs,
    output: Output<'_>,
    cancel: &CancellationToken,
) -> Result<()> {
    OutputFormat::from_str(output.format)?;
    let reconciler = build_reconciler(&config, metrics)?;
    let resource = handle(&reconciler, type_name)?;
    let desired = load_desired(resource.schema(), desired, None, None)?;

    info!("Creating {}", type_name);
    let created = resource
        .create(&desired, &call_options(cancel))
        .await
        .with_context(|| format!("Failed to create {}", type_name))?;
    eprintln!("Created {} {}", type_name, created.id);
    output.instance(&created)
}

pub async fn run_read(
    config: Config,
    metrics: bool,
    type_name: &str,
    id: &str,
    output: Output<'_>,
    cancel: &CancellationToken,
) -> Result<()> {
    OutputFormat::from_str(output.format)?;
    let reconciler = build_reconciler(&config, metrics)?;
    let resource = handle(&reconciler, type_name)?;

    let instance = resource
        .read(id, &call_options(cancel))
        .await
        .with_context(|| format!("Failed to read {} {}", type_name, id))?;
    output.instance(&instance)
}

#[allow(clippy::too_many_arguments)]
pub async fn run_update(
    config: Config,
    metrics: bool,
    type_name: &str,
    id: &str,
    desired: &DesiredArgs,
    replace: bool,
    dry_run: bool,
    output: Output<'_>,
    cancel: &CancellationToken,
) -> Result<()> {
    OutputFormat::from_str(output.format)?;
    let reconciler = build_reconciler(&config, metrics)?;
    let resource = handle(&reconciler, type_name)?;
    let opts = call_options(cancel);

    let current = resource
        .read(id, &opts)
        .await
        .with_context(|| format!("Failed to read {} {}", type_name, id))?;

    let base = (!replace).then(|| editable(resource.schema(), &current.values));
    let desired = load_desired(resource.schema(), desired, Some(&current.id), base)?;

    if dry_run {
        let diff = resource
            .plan(&current, &desired)
            .with_context(|| format!("Failed to plan update of {} {}", type_name, id))?;
        return output.changes(&ChangesOutput {
            type_name: type_name.to_string(),
            id: current.id.clone(),
            written: false,
            changes: diff.changes().iter().map(ChangeRow::from).collect(),
        });
    }

    info!("Updating {} {}", type_name, current.id);
    let outcome = resource
        .update(&current, &desired, &opts)
        .await
        .with_context(|| format!("Failed to update {} {}", type_name, id))?;

    output.changes(&ChangesOutput {
        type_name: type_name.to_string(),
        id: outcome.instance.id.clone(),
        written: outcome.written,
        changes: outcome.changes.iter().map(ChangeRow::from).collect(),
    })
}

pub async fn run_delete(
    config: Config,
    metrics: bool,
    type_name: &str,
    id: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let reconciler = build_reconciler(&config, metrics)?;
    let resource = handle(&reconciler, type_name)?;

    info!("Deleting {} {}", type_name, id);
    resource
        .delete(id, &call_options(cancel))
        .await
        .with_context(|| format!("Failed to delete {} {}", type_name, id))?;
    println!("Deleted {} {}", type_name, id);
    Ok(())
}

pub async fn run_import(
    config: Config,
    metrics: bool,
    type_name: &str,
    token: &str,
    output: Output<'_>,
    cancel: &CancellationToken,
) -> Result<()> {
    OutputFormat::from_str(output.format)?;
    let reconciler = build_reconciler(&config, metrics)?;
    let resource = handle(&reconciler, type_name)?;

    info!("Importing {} {}", type_name, token);
    let imported = resource
        .import(token, &call_options(cancel))
        .await
        .with_context(|| format!("Failed to import {} {}", type_name, token))?;
    output.instance(&imported)
}
