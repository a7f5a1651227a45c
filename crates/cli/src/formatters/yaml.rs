//! YAML formatter implementation.
//!
//! Responsibilities:
//! - Format all output shapes as YAML, suitable for keeping desired state
//!   next to other configuration.
//!
//! Does NOT handle:
//! - Other output formats.

use anyhow::Result;
use routeros_engine::ResourceInstance;

use crate::formatters::{ChangesOutput, Formatter, ResourceSummary, SchemaOutput};

/// YAML formatter.
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn format_resources(&self, resources: &[ResourceSummary]) -> Result<String> {
        Ok(serde_yaml::to_string(resources)?)
    }

    fn format_schema(&self, schema: &SchemaOutput) -> Result<String> {
        Ok(serde_yaml::to_string(schema)?)
    }

    fn format_instance(&self, instance: &ResourceInstance) -> Result<String> {
        Ok(serde_yaml::to_string(instance)?)
    }

    fn format_changes(&self, changes: &ChangesOutput) -> Result<String> {
        Ok(serde_yaml::to_string(changes)?)
    }
}
