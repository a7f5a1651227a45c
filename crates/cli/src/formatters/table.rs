//! Table formatter implementation.
//!
//! Responsibilities:
//! - Format output shapes as tab-separated tables for terminals.
//! - Flatten block attributes of instances to `block.member` rows.
//!
//! Does NOT handle:
//! - Other output formats.
//! - File I/O.

use anyhow::Result;
use routeros_engine::{Record, ResourceInstance, Value};

use crate::formatters::common::format_missing;
use crate::formatters::{ChangesOutput, Formatter, ResourceSummary, SchemaOutput};

/// Table formatter.
pub struct TableFormatter;

fn push_row(output: &mut String, cells: &[&str]) {
    output.push_str(&cells.join("\t"));
    output.push('\n');
}

fn flatten_record(record: &Record, prefix: &str, rows: &mut Vec<(String, String)>) {
    for (name, value) in record.iter() {
        match value {
            Value::Block(block) => flatten_record(block, &format!("{prefix}{name}."), rows),
            other => rows.push((format!("{prefix}{name}"), other.to_string())),
        }
    }
}

fn flag(set: bool, text: &'static str) -> &'static str {
    if set { text } else { "" }
}

impl Formatter for TableFormatter {
    fn format_resources(&self, resources: &[ResourceSummary]) -> Result<String> {
        if resources.is_empty() {
            return Ok("No resource types registered.".to_string());
        }

        let mut output = String::new();
        push_row(&mut output, &["TYPE", "PATH", "ID", "NATURAL KEY", "ATTRIBUTES"]);
        for resource in resources {
            push_row(
                &mut output,
                &[
                    &resource.type_name,
                    &resource.path,
                    resource.id_kind,
                    format_missing(resource.natural_key.as_deref()),
                    &resource.attributes.to_string(),
                ],
            );
        }
        Ok(output)
    }

    fn format_schema(&self, schema: &SchemaOutput) -> Result<String> {
        let summary = &schema.summary;
        let mut output = format!(
            "{} ({}, identified by {}, natural key {})\n\n",
            summary.type_name,
            summary.path,
            summary.id_kind,
            format_missing(summary.natural_key.as_deref())
        );
        push_row(
            &mut output,
            &["NAME", "DEVICE KEY", "TYPE", "FLAGS", "DEFAULT", "VALIDATOR"],
        );
        for row in &schema.rows {
            let flags: Vec<&str> = [
                flag(row.required, "required"),
                flag(row.computed, "computed"),
                flag(row.sticky, "sticky"),
                if row.equivalence == "exact" { "" } else { row.equivalence },
            ]
            .into_iter()
            .filter(|f| !f.is_empty())
            .collect();
            let flags = flags.join(",");
            push_row(
                &mut output,
                &[
                    &row.name,
                    &row.device_key,
                    row.type_name,
                    format_missing((!flags.is_empty()).then_some(flags.as_str())),
                    format_missing(row.default.as_deref()),
                    format_missing(row.validator.as_deref()),
                ],
            );
        }
        Ok(output)
    }

    fn format_instance(&self, instance: &ResourceInstance) -> Result<String> {
        let mut rows = Vec::new();
        flatten_record(&instance.values, "", &mut rows);

        let mut output = format!("{} {} ({})\n", instance.type_name, instance.id, instance.path);
        if rows.is_empty() {
            output.push_str("No attributes set.\n");
            return Ok(output);
        }
        let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, value) in rows {
            output.push_str(&format!("  {name:<width$}  {value}\n"));
        }
        Ok(output)
    }

    fn format_changes(&self, changes: &ChangesOutput) -> Result<String> {
        if changes.changes.is_empty() {
            return Ok(format!(
                "{} {} is up to date.",
                changes.type_name, changes.id
            ));
        }

        let verb = if changes.written { "Applied" } else { "Pending" };
        let mut output = format!(
            "{verb} {} change(s) to {} {}\n",
            changes.changes.len(),
            changes.type_name,
            changes.id
        );
        push_row(&mut output, &["ATTRIBUTE", "DEVICE KEY", "OBSERVED", "DESIRED"]);
        for change in &changes.changes {
            push_row(
                &mut output,
                &[
                    &change.attribute,
                    &change.device_key,
                    format_missing(change.observed.as_deref()),
                    change.desired.as_deref().unwrap_or("(unset)"),
                ],
            );
        }
        Ok(output)
    }
}
