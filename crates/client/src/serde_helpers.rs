//! Conversion of device JSON into property bags.
//!
//! Responsibilities:
//! - Accept RouterOS JSON objects whose values are normally strings but may
//!   arrive as numbers, booleans or null depending on firmware version.
//!
//! Explicitly does NOT handle:
//! - Typing values against a schema (the engine's codec does that).
//!
//! Invariants / assumptions:
//! - Every scalar is stringified the way the device would print it.
//! - Nested arrays/objects are kept as compact JSON text rather than rejected.

use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::models::PropertyBag;

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Convert one JSON object into a property bag.
pub(crate) fn bag_from_json(value: Value) -> Result<PropertyBag> {
    match value {
        Value::Object(map) => Ok(map.into_iter().map(|(k, v)| (k, stringify(v))).collect()),
        other => Err(ClientError::InvalidResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Convert a collection listing into property bags.
///
/// A single object is accepted as a one-element listing.
pub(crate) fn bags_from_json(value: Value) -> Result<Vec<PropertyBag>> {
    match value {
        Value::Array(items) => items.into_iter().map(bag_from_json).collect(),
        obj @ Value::Object(_) => Ok(vec![bag_from_json(obj)?]),
        other => Err(ClientError::InvalidResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bag_from_json_stringifies_scalars() {
        let bag = bag_from_json(json!({
            ".id": "*2",
            "disabled": false,
            "hold-time": 180,
            "comment": null
        }))
        .unwrap();

        assert_eq!(bag[".id"], "*2");
        assert_eq!(bag["disabled"], "false");
        assert_eq!(bag["hold-time"], "180");
        assert_eq!(bag["comment"], "");
    }

    #[test]
    fn test_bag_from_json_rejects_non_object() {
        let err = bag_from_json(json!("nope")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(msg) if msg.contains("string")));
    }

    #[test]
    fn test_bags_from_json_accepts_single_object() {
        let bags = bags_from_json(json!({"name": "default"})).unwrap();
        assert_eq!(bags.len(), 1);
        assert_eq!(bags[0]["name"], "default");
    }

    #[test]
    fn test_bags_from_json_empty_array() {
        assert!(bags_from_json(json!([])).unwrap().is_empty());
    }
}
