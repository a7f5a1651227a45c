//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide the output formats: table, JSON and YAML.
//! - Define the serializable output shapes for resource types, schemas,
//!   instances and change sets.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings; see `common::output_result`).
//!
//! Invariants:
//! - Machine-readable formats (JSON, YAML) emit valid documents even when empty.
//! - Tables use tab-separation and print a human message for empty sets.

use anyhow::Result;
use routeros_engine::{
    AttrKind, Attribute, Change, Equivalence, IdKind, ResourceInstance, ResourceSchema, Validator,
};
use serde::Serialize;

mod common;
mod json;
mod table;
mod yaml;

pub use common::{output_result, write_to_file};
pub use json::JsonFormatter;
pub use table::TableFormatter;
pub use yaml::YamlFormatter;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => anyhow::bail!(
                "Invalid output format: {}. Valid options: table, json, yaml",
                s
            ),
        }
    }
}

/// One registered resource type.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSummary {
    #[serde(rename = "type")]
    pub type_name: String,
    pub path: String,
    pub id_kind: &'static str,
    pub natural_key: Option<String>,
    pub attributes: usize,
}

impl From<&ResourceSchema> for ResourceSummary {
    fn from(resource: &ResourceSchema) -> Self {
        Self {
            type_name: resource.type_name().to_string(),
            path: resource.path().to_string(),
            id_kind: id_kind_name(resource.identifier_kind()),
            natural_key: resource
                .natural_key_attribute()
                .map(|attr| attr.name().to_string()),
            attributes: resource.schema().attributes().len(),
        }
    }
}

/// One attribute row of `schema` output. Block members are flattened to
/// `block.member` rows.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeRow {
    pub name: String,
    pub device_key: String,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub required: bool,
    pub computed: bool,
    pub sticky: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
    pub equivalence: &'static str,
}

/// Full description of one resource type.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaOutput {
    #[serde(flatten)]
    pub summary: ResourceSummary,
    #[serde(rename = "attribute_list")]
    pub rows: Vec<AttributeRow>,
}

impl From<&ResourceSchema> for SchemaOutput {
    fn from(resource: &ResourceSchema) -> Self {
        let mut rows = Vec::new();
        for attr in resource.schema().attributes() {
            rows.push(attribute_row(attr, "", ""));
            if let AttrKind::Block(nested) = attr.kind() {
                let name_prefix = format!("{}.", attr.name());
                let key_prefix = format!("{}.", attr.key());
                rows.extend(
                    nested
                        .attributes()
                        .iter()
                        .map(|member| attribute_row(member, &name_prefix, &key_prefix)),
                );
            }
        }
        Self {
            summary: ResourceSummary::from(resource),
            rows,
        }
    }
}

fn attribute_row(attr: &Attribute, name_prefix: &str, key_prefix: &str) -> AttributeRow {
    AttributeRow {
        name: format!("{name_prefix}{}", attr.name()),
        device_key: format!("{key_prefix}{}", attr.key()),
        type_name: attr.kind().type_name(),
        required: attr.is_required(),
        computed: attr.is_computed(),
        sticky: attr.is_sticky(),
        default: attr.default_value().map(ToString::to_string),
        validator: attr.validator_rule().map(describe_validator),
        equivalence: equivalence_name(attr.equivalence_rule()),
    }
}

fn describe_validator(validator: &Validator) -> String {
    match validator {
        Validator::OneOf(allowed) => format!("one of {}", allowed.join("|")),
        Validator::EachOneOf(allowed) => format!("each one of {}", allowed.join("|")),
        Validator::IntRange(min, max) => format!("{min}..={max}"),
        Validator::Ipv4 => "ipv4 address".to_string(),
        Validator::Duration => "duration".to_string(),
        Validator::DurationRange(min, max) => {
            format!("duration {}s..={}s or infinity", min.as_secs(), max.as_secs())
        }
    }
}

fn equivalence_name(equivalence: Equivalence) -> &'static str {
    match equivalence {
        Equivalence::Exact => "exact",
        Equivalence::Duration => "duration",
        Equivalence::CaseInsensitive => "case-insensitive",
    }
}

fn id_kind_name(kind: IdKind) -> &'static str {
    match kind {
        IdKind::Id => "id",
        IdKind::Name => "name",
    }
}

/// One attribute change, as encoded for the device.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRow {
    pub attribute: String,
    pub device_key: String,
    pub observed: Option<String>,
    pub desired: Option<String>,
}

impl From<&Change> for ChangeRow {
    fn from(change: &Change) -> Self {
        Self {
            attribute: change.path.clone(),
            device_key: change.device_key.clone(),
            observed: change.observed.clone(),
            desired: change.desired.clone(),
        }
    }
}

/// Result of an update (or a dry run).
#[derive(Debug, Clone, Serialize)]
pub struct ChangesOutput {
    #[serde(rename = "type")]
    pub type_name: String,
    pub id: String,
    pub written: bool,
    pub changes: Vec<ChangeRow>,
}

/// Formatter trait for different output types.
pub trait Formatter {
    fn format_resources(&self, resources: &[ResourceSummary]) -> Result<String>;

    fn format_schema(&self, schema: &SchemaOutput) -> Result<String>;

    fn format_instance(&self, instance: &ResourceInstance) -> Result<String>;

    fn format_changes(&self, changes: &ChangesOutput) -> Result<String>;
}

/// Get a formatter for the given format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Yaml => Box::new(YamlFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeros_engine::Registry;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("yml").unwrap(), OutputFormat::Yaml);
        assert_eq!(OutputFormat::from_str("table").unwrap(), OutputFormat::Table);
        assert!(OutputFormat::from_str("csv").is_err());
    }

    #[test]
    fn test_schema_output_flattens_blocks() {
        let registry = Registry::builtin().unwrap();
        let output = SchemaOutput::from(registry.get("bgp_template").unwrap());

        let filter = output
            .rows
            .iter()
            .find(|row| row.name == "input.filter")
            .unwrap();
        assert_eq!(filter.device_key, "input.filter");

        let communities = output
            .rows
            .iter()
            .find(|row| row.name == "input.accept_comunities")
            .unwrap();
        assert_eq!(communities.device_key, "input.accept-communities");

        let hold_time = output.rows.iter().find(|row| row.name == "hold_time").unwrap();
        assert_eq!(hold_time.default.as_deref(), Some("3m"));
        assert_eq!(hold_time.equivalence, "duration");
        assert_eq!(
            hold_time.validator.as_deref(),
            Some("duration 3s..=3600s or infinity")
        );
        assert_eq!(output.summary.natural_key.as_deref(), Some("name"));
    }
}
