//! Offline commands over the built-in registry: `resources` and `schema`.
//!
//! Responsibilities:
//! - List registered resource types.
//! - Describe one type's attributes, device keys, defaults and rules.
//!
//! Does NOT handle:
//! - Any device traffic; these commands need no connection settings.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::formatters::{
    OutputFormat, ResourceSummary, SchemaOutput, get_formatter, output_result,
};

pub fn run_resources(output_format: &str, output_file: Option<PathBuf>) -> Result<()> {
    let registry = super::registry()?;
    info!("Listing {} resource type(s)", registry.len());

    let summaries: Vec<ResourceSummary> = registry.iter().map(ResourceSummary::from).collect();

    let format = OutputFormat::from_str(output_format)?;
    let output = get_formatter(format).format_resources(&summaries)?;
    output_result(&output, format, output_file.as_ref())
}

pub fn run_schema(type_name: &str, output_format: &str, output_file: Option<PathBuf>) -> Result<()> {
    let registry = super::registry()?;
    let resource = super::resource_schema(&registry, type_name)?;

    let format = OutputFormat::from_str(output_format)?;
    let output = get_formatter(format).format_schema(&SchemaOutput::from(resource))?;
    output_result(&output, format, output_file.as_ref())
}
