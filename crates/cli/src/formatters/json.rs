//! JSON formatter implementation.
//!
//! Responsibilities:
//! - Format all output shapes as pretty-printed JSON.
//!
//! Does NOT handle:
//! - Other output formats.

use anyhow::Result;
use routeros_engine::ResourceInstance;

use crate::formatters::{ChangesOutput, Formatter, ResourceSummary, SchemaOutput};

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_resources(&self, resources: &[ResourceSummary]) -> Result<String> {
        Ok(serde_json::to_string_pretty(resources)?)
    }

    fn format_schema(&self, schema: &SchemaOutput) -> Result<String> {
        Ok(serde_json::to_string_pretty(schema)?)
    }

    fn format_instance(&self, instance: &ResourceInstance) -> Result<String> {
        Ok(serde_json::to_string_pretty(instance)?)
    }

    fn format_changes(&self, changes: &ChangesOutput) -> Result<String> {
        Ok(serde_json::to_string_pretty(changes)?)
    }
}
