//! Typed attribute values and records.
//!
//! Responsibilities:
//! - Represent one attribute value (`Value`) and a full set of values (`Record`).
//! - Convert JSON documents into records shaped by a `Schema`.
//! - Serialize records back to JSON for output.
//!
//! Does NOT handle:
//! - Device string encoding (see `codec`).
//! - Validator checks beyond type conversion (see `schema::Schema::validate`).
//!
//! Invariants:
//! - `Set` values are stored sorted so iteration order is deterministic.
//! - A JSON `null` means "not supplied" and never produces a value.

use crate::schema::{AttrKind, DataType, Schema, ValidationErrors, Violation};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    List(Vec<String>),
    Set(BTreeSet<String>),
    Block(Record),
}

impl Value {
    /// Build a set value from any iterable of strings.
    pub fn set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Set(items.into_iter().map(Into::into).collect())
    }

    /// Build a list value from any iterable of strings.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Record> {
        match self {
            Self::Block(record) => Some(record),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Block(_) => "block",
        }
    }

    /// Whether this value has the shape `kind` expects.
    pub fn matches(&self, kind: &AttrKind) -> bool {
        matches!(
            (self, kind),
            (Self::String(_), AttrKind::Scalar(DataType::String))
                | (Self::Bool(_), AttrKind::Scalar(DataType::Bool))
                | (Self::Int(_), AttrKind::Scalar(DataType::Int))
                | (Self::List(_), AttrKind::List)
                | (Self::Set(_), AttrKind::Set)
                | (Self::Block(_), AttrKind::Block(_))
        )
    }

    /// List or set items that would not decode back to themselves.
    pub(crate) fn defective_items(&self) -> Vec<(&str, &'static str)> {
        let items: Vec<&String> = match self {
            Self::List(items) => items.iter().collect(),
            Self::Set(items) => items.iter().collect(),
            _ => Vec::new(),
        };
        items
            .into_iter()
            .filter_map(|item| item_defect(item).map(|reason| (item.as_str(), reason)))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::List(items) => items.iter().cloned().collect(),
            Self::Set(items) => items.iter().cloned().collect(),
            Self::Block(record) => record.to_json(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Block(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::List(items) => f.write_str(&items.join(",")),
            Self::Set(items) => {
                let joined: Vec<&str> = items.iter().map(String::as_str).collect();
                f.write_str(&joined.join(","))
            }
            Self::Block(record) => write!(f, "{}", record.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Block(record) => record.serialize(serializer),
        }
    }
}

/// Attribute name to value mapping for one resource (or one nested block).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of this record with every unsupplied optional, non-computed
    /// attribute set to its declared default.
    ///
    /// Defaults are filled inside supplied blocks too; absent blocks stay absent.
    pub fn with_defaults(&self, schema: &Schema) -> Record {
        let mut filled = self.clone();
        for attr in schema.attributes() {
            match (attr.kind(), filled.get_mut(attr.name())) {
                (AttrKind::Block(nested), Some(Value::Block(block))) => {
                    *block = block.with_defaults(nested);
                }
                (_, Some(_)) => {}
                (_, None) => {
                    if !attr.is_computed()
                        && let Some(default) = attr.default_value()
                    {
                        filled.insert(attr.name(), default.clone());
                    }
                }
            }
        }
        filled
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Convert a JSON object into a record shaped by `schema`.
    ///
    /// Keys may be attribute names or device keys. Scalars are coerced where
    /// the intent is unambiguous (numbers for string attributes, `"yes"` for
    /// booleans, comma-separated strings for lists and sets). All conversion
    /// problems are collected rather than stopping at the first.
    pub fn from_json(schema: &Schema, json: &serde_json::Value) -> Result<Record, ValidationErrors> {
        let mut violations = Vec::new();
        let record = record_from_json(schema, json, "", &mut violations);
        if violations.is_empty() {
            Ok(record)
        } else {
            Err(ValidationErrors::new(violations))
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn record_from_json(
    schema: &Schema,
    json: &serde_json::Value,
    prefix: &str,
    violations: &mut Vec<Violation>,
) -> Record {
    let Some(object) = json.as_object() else {
        violations.push(Violation::type_mismatch(
            prefix.trim_end_matches('.'),
            "object",
        ));
        return Record::new();
    };

    let mut record = Record::new();
    for (key, raw) in object {
        let path = format!("{prefix}{key}");
        let Some(attr) = schema.lookup(key) else {
            violations.push(Violation::unknown(path));
            continue;
        };
        if raw.is_null() {
            continue;
        }
        let value = match attr.kind() {
            AttrKind::Block(nested) => {
                Some(Value::Block(record_from_json(nested, raw, &format!("{path}."), violations)))
            }
            kind => value_from_json(kind, raw),
        };
        match value {
            Some(value) => {
                record.insert(attr.name(), value);
            }
            None => violations.push(Violation::type_mismatch(path, attr.kind().type_name())),
        }
    }
    record
}

fn value_from_json(kind: &AttrKind, raw: &serde_json::Value) -> Option<Value> {
    use serde_json::Value as Json;

    match (kind, raw) {
        (AttrKind::Scalar(DataType::String), Json::String(s)) => Some(Value::String(s.clone())),
        (AttrKind::Scalar(DataType::String), Json::Number(n)) => Some(Value::String(n.to_string())),
        (AttrKind::Scalar(DataType::Bool), Json::Bool(b)) => Some(Value::Bool(*b)),
        (AttrKind::Scalar(DataType::Bool), Json::String(s)) => parse_bool(s).map(Value::Bool),
        (AttrKind::Scalar(DataType::Int), Json::Number(n)) => n.as_i64().map(Value::Int),
        (AttrKind::Scalar(DataType::Int), Json::String(s)) => s.trim().parse().ok().map(Value::Int),
        (AttrKind::List, Json::Array(items)) => string_items(items).map(Value::List),
        (AttrKind::List, Json::String(s)) => Some(Value::List(split_items(s).collect())),
        (AttrKind::Set, Json::Array(items)) => {
            string_items(items).map(|items| Value::Set(items.into_iter().collect()))
        }
        (AttrKind::Set, Json::String(s)) => Some(Value::Set(split_items(s).collect())),
        _ => None,
    }
}

fn string_items(items: &[serde_json::Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| match item {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

/// Split a comma-separated device string into trimmed, non-empty items.
pub(crate) fn split_items(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

/// Why `item` cannot survive a trip through a comma-joined device string.
pub(crate) fn item_defect(item: &str) -> Option<&'static str> {
    if item.trim().is_empty() {
        Some("items cannot be blank")
    } else if item.contains(',') {
        Some("items cannot contain ','")
    } else if item.trim() != item {
        Some("items cannot start or end with whitespace")
    } else {
        None
    }
}

/// Parse the boolean spellings RouterOS uses.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}
