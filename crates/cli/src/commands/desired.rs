//! Desired-state input.
//!
//! Responsibilities:
//! - Read a JSON file of attribute values and `--set KEY=VALUE` assignments.
//! - Merge them over an optional base record (the current state for updates).
//!
//! Invariants:
//! - `--set` wins over the file, the file wins over the base.
//! - `--set KEY=` removes the attribute (or block member) from the result.
//! - Input problems surface as engine validation/codec errors so they map to
//!   the validation exit code.

use std::path::Path;

use anyhow::{Context, Result};
use routeros_client::PropertyBag;
use routeros_engine::codec::decode_sparse;
use routeros_engine::{
    AttrKind, CodecError, ReconcileError, Record, ResourcePath, ResourceSchema, Value,
};

use crate::args::DesiredArgs;

/// Build the desired record for `resource`.
///
/// `id` is only used to label errors.
pub fn load_desired(
    resource: &ResourceSchema,
    args: &DesiredArgs,
    id: Option<&str>,
    base: Option<Record>,
) -> Result<Record> {
    let paths = ResourcePath::of(resource);
    let error_path = match id {
        Some(id) => paths.item(id),
        None => paths.collection().to_string(),
    };
    let mut desired = base.unwrap_or_default();

    if let Some(file) = &args.file {
        let from_file = read_file(resource, file, &error_path, id)?;
        overlay(&mut desired, from_file);
    }

    let (assignments, clears) = split_assignments(&args.set)?;
    let from_flags = decode_sparse(resource.schema(), &assignments).map_err(|source| {
        ReconcileError::Codec {
            path: error_path.clone(),
            id: id.map(str::to_string),
            source,
        }
    })?;
    overlay(&mut desired, from_flags);

    for key in clears {
        clear(resource, &mut desired, &key).map_err(|source| ReconcileError::Codec {
            path: error_path.clone(),
            id: id.map(str::to_string),
            source,
        })?;
    }

    Ok(desired)
}

/// Current values minus computed attributes, as a starting point for updates.
pub fn editable(resource: &ResourceSchema, current: &Record) -> Record {
    current
        .iter()
        .filter(|(name, _)| {
            resource
                .schema()
                .get(name)
                .is_some_and(|attr| !attr.is_computed())
        })
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn read_file(
    resource: &ResourceSchema,
    file: &Path,
    error_path: &str,
    id: Option<&str>,
) -> Result<Record> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {} as JSON", file.display()))?;
    let record = Record::from_json(resource.schema(), &json).map_err(|errors| {
        ReconcileError::Validation {
            path: error_path.to_string(),
            id: id.map(str::to_string),
            errors,
        }
    })?;
    Ok(record)
}

fn split_assignments(pairs: &[String]) -> Result<(PropertyBag, Vec<String>)> {
    let mut assignments = PropertyBag::new();
    let mut clears = Vec::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Invalid --set '{}': expected KEY=VALUE", pair))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Invalid --set '{}': key is empty", pair);
        }
        if value.trim().is_empty() {
            assignments.remove(key);
            clears.push(key.to_string());
        } else {
            clears.retain(|cleared| cleared != key);
            assignments.insert(key.to_string(), value.to_string());
        }
    }
    Ok((assignments, clears))
}

/// Copy `top` over `base`, merging block members.
fn overlay(base: &mut Record, top: Record) {
    for (name, value) in top.iter() {
        if let (Some(Value::Block(existing)), Value::Block(members)) = (base.get_mut(name), value) {
            overlay(existing, members.clone());
            continue;
        }
        base.insert(name, value.clone());
    }
}

fn clear(
    resource: &ResourceSchema,
    record: &mut Record,
    key: &str,
) -> std::result::Result<(), CodecError> {
    let unknown = || CodecError::UnknownKey(key.to_string());
    let (head, member) = match key.split_once('.') {
        Some((head, member)) => (head, Some(member)),
        None => (key, None),
    };
    let attr = resource.schema().lookup(head).ok_or_else(unknown)?;
    match (attr.kind(), member) {
        (AttrKind::Block(nested), Some(member)) => {
            let member = nested.lookup(member).ok_or_else(unknown)?;
            if let Some(Value::Block(block)) = record.get_mut(attr.name()) {
                block.remove(member.name());
            }
        }
        (_, None) => {
            record.remove(attr.name());
        }
        (_, Some(_)) => return Err(unknown()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeros_engine::Registry;
    use std::io::Write;

    fn template() -> ResourceSchema {
        Registry::builtin()
            .unwrap()
            .get("bgp_template")
            .unwrap()
            .clone()
    }

    fn args(file: Option<&Path>, set: &[&str]) -> DesiredArgs {
        DesiredArgs {
            file: file.map(Path::to_path_buf),
            set: set.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_set_values_are_decoded_by_schema() {
        let desired = load_desired(
            &template(),
            &args(None, &["name=edge", "as=65001", "address-families=ipv6,ip", "input.filter=in"]),
            None,
            None,
        )
        .unwrap();
        assert_eq!(desired.get("name"), Some(&Value::from("edge")));
        assert_eq!(desired.get("address_families"), Some(&Value::set(["ip", "ipv6"])));
        assert_eq!(
            desired.get("input"),
            Some(&Value::Block(Record::new().with("filter", "in")))
        );
    }

    #[test]
    fn test_set_overrides_file_and_merges_blocks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name": "edge", "as": 65001, "input": {{"filter": "from-file", "allow_as": 2}}}}"#
        )
        .unwrap();

        let desired = load_desired(
            &template(),
            &args(Some(file.path()), &["input.filter=from-flag"]),
            None,
            None,
        )
        .unwrap();
        let input = desired.get("input").and_then(Value::as_block).unwrap();
        assert_eq!(input.get("filter"), Some(&Value::from("from-flag")));
        assert_eq!(input.get("allow_as"), Some(&Value::Int(2)));
        assert_eq!(desired.get("as"), Some(&Value::from("65001")));
    }

    #[test]
    fn test_blank_set_clears_base_value() {
        let base = Record::new()
            .with("name", "edge")
            .with("comment", "old")
            .with("input", Record::new().with("filter", "in").with("allow_as", 1));
        let desired = load_desired(
            &template(),
            &args(None, &["comment=", "input.filter="]),
            Some("*1"),
            Some(base),
        )
        .unwrap();
        assert!(!desired.contains("comment"));
        let input = desired.get("input").and_then(Value::as_block).unwrap();
        assert!(!input.contains("filter"));
        assert!(input.contains("allow_as"));
    }

    #[test]
    fn test_unknown_key_is_codec_error() {
        let err = load_desired(&template(), &args(None, &["bogus=1"]), None, None).unwrap_err();
        let reconcile = err.downcast_ref::<ReconcileError>().unwrap();
        assert!(matches!(reconcile, ReconcileError::Codec { path, .. } if path == "/routing/bgp/template"));
    }

    #[test]
    fn test_malformed_assignment_is_rejected() {
        let err = load_desired(&template(), &args(None, &["name"]), None, None).unwrap_err();
        assert!(err.to_string().contains("expected KEY=VALUE"));
    }

    #[test]
    fn test_file_shape_errors_are_validation_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "edge", "multihop": "sometimes"}}"#).unwrap();
        let err = load_desired(&template(), &args(Some(file.path()), &[]), Some("*2"), None)
            .unwrap_err();
        let reconcile = err.downcast_ref::<ReconcileError>().unwrap();
        assert!(matches!(reconcile, ReconcileError::Validation { id: Some(id), .. } if id == "*2"));
    }

    #[test]
    fn test_editable_drops_computed() {
        let current = Record::new()
            .with("name", "edge")
            .with("routing_table", "main");
        let base = editable(&template(), &current);
        assert!(base.contains("name"));
        assert!(!base.contains("routing_table"));
    }
}
