//! Conversion between typed records and device property bags.
//!
//! Responsibilities:
//! - Encode values to the strings RouterOS expects (`true`/`false`,
//!   decimal integers, comma-joined lists and sets).
//! - Flatten block attributes to `<block>.<member>` device keys and back.
//! - Decode full device responses, filling declared defaults for blank or
//!   missing attributes and ignoring keys the schema does not declare.
//! - Decode sparse `key=value` input where every key must be known.
//!
//! Does NOT handle:
//! - Validation (see `schema::Schema::validate`).
//! - Equivalence of differently spelled values (see `diff`).
//!
//! Invariants:
//! - Sets encode in sorted order, so equal sets always encode identically.
//! - An empty block encodes to no keys at all.
//! - A blank device string decodes to the attribute default, or to nothing.

use crate::schema::{AttrKind, Attribute, DataType, Schema};
use crate::value::{Record, Value, parse_bool, split_items};
use routeros_client::PropertyBag;
use thiserror::Error;
use tracing::trace;

/// Errors converting between records and property bags.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("{attribute}: cannot decode {raw:?} as {expected}")]
    Malformed {
        attribute: String,
        raw: String,
        expected: &'static str,
    },

    #[error("{attribute}: expected a {expected} value, got {found}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{attribute}: cannot encode item {item:?}, {reason}")]
    UnencodableItem {
        attribute: String,
        item: String,
        reason: &'static str,
    },

    #[error("unknown attribute {0:?}")]
    UnknownKey(String),
}

/// Encode one non-block value for `attr`.
///
/// List and set items must come back unchanged from [`decode_value`], so
/// blank items, items containing `,` and items with surrounding whitespace
/// are rejected.
pub fn encode_value(attr: &Attribute, value: &Value) -> Result<String, CodecError> {
    if matches!(attr.kind(), AttrKind::Block(_)) || !value.matches(attr.kind()) {
        return Err(CodecError::TypeMismatch {
            attribute: attr.name().to_string(),
            expected: attr.kind().type_name(),
            found: value.kind_name(),
        });
    }
    if let Some((item, reason)) = value.defective_items().into_iter().next() {
        return Err(CodecError::UnencodableItem {
            attribute: attr.name().to_string(),
            item: item.to_string(),
            reason,
        });
    }
    Ok(match value {
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        other => other.to_string(),
    })
}

/// Decode one raw device string for a non-block `attr`.
///
/// Blank strings yield the attribute default (if any).
pub fn decode_value(attr: &Attribute, raw: &str) -> Result<Option<Value>, CodecError> {
    if raw.trim().is_empty() {
        return Ok(attr.default_value().cloned());
    }
    let malformed = |expected| CodecError::Malformed {
        attribute: attr.name().to_string(),
        raw: raw.to_string(),
        expected,
    };
    let value = match attr.kind() {
        AttrKind::Scalar(DataType::String) => Value::String(raw.to_string()),
        AttrKind::Scalar(DataType::Bool) => Value::Bool(parse_bool(raw).ok_or_else(|| malformed("bool"))?),
        AttrKind::Scalar(DataType::Int) => {
            Value::Int(raw.trim().parse().map_err(|_| malformed("int"))?)
        }
        AttrKind::List => Value::List(split_items(raw).collect()),
        AttrKind::Set => Value::Set(split_items(raw).collect()),
        AttrKind::Block(_) => return Err(malformed("block")),
    };
    Ok(Some(value))
}

/// Encode every attribute present in `record` into a flat property bag.
pub fn encode_record(schema: &Schema, record: &Record) -> Result<PropertyBag, CodecError> {
    let mut bag = PropertyBag::new();
    for (name, value) in record.iter() {
        let attr = schema
            .get(name)
            .ok_or_else(|| CodecError::UnknownKey(name.to_string()))?;
        match (attr.kind(), value) {
            (AttrKind::Block(nested), Value::Block(block)) => {
                for (member_name, member_value) in block.iter() {
                    let member = nested.get(member_name).ok_or_else(|| {
                        CodecError::UnknownKey(format!("{name}.{member_name}"))
                    })?;
                    bag.insert(
                        format!("{}.{}", attr.key(), member.key()),
                        encode_value(member, member_value)?,
                    );
                }
            }
            _ => {
                bag.insert(attr.key().to_string(), encode_value(attr, value)?);
            }
        }
    }
    Ok(bag)
}

/// Decode a full device response into a record.
///
/// Missing or blank attributes take their declared default. Keys the schema
/// does not know (read-only metadata such as `.about` or `inactive`) are
/// skipped.
pub fn decode_bag(schema: &Schema, bag: &PropertyBag) -> Result<Record, CodecError> {
    let mut record = Record::new();
    for attr in schema.attributes() {
        match attr.kind() {
            AttrKind::Block(nested) => {
                let prefix = format!("{}.", attr.key());
                let members: PropertyBag = bag
                    .iter()
                    .filter_map(|(key, raw)| {
                        key.strip_prefix(&prefix)
                            .map(|member| (member.to_string(), raw.clone()))
                    })
                    .collect();
                if members.is_empty() {
                    continue;
                }
                let block = decode_bag(nested, &members)?;
                if !block.is_empty() {
                    record.insert(attr.name(), block);
                }
            }
            _ => {
                let decoded = match bag.get(attr.key()) {
                    Some(raw) => decode_value(attr, raw)?,
                    None => attr.default_value().cloned(),
                };
                if let Some(value) = decoded {
                    record.insert(attr.name(), value);
                }
            }
        }
    }

    for key in bag.keys() {
        let head = key.split('.').next().unwrap_or(key);
        if schema.by_device_key(key).is_none() && schema.by_device_key(head).is_none() {
            trace!(key = %key, "Ignoring undeclared device key");
        }
    }
    Ok(record)
}

/// Decode sparse `key=value` input.
///
/// Keys are attribute names or device keys, with `block.member` for block
/// members. Unlike [`decode_bag`], unknown keys are errors and nothing is
/// filled from defaults except for blank values.
pub fn decode_sparse(schema: &Schema, bag: &PropertyBag) -> Result<Record, CodecError> {
    let mut record = Record::new();
    for (key, raw) in bag {
        let (head, member) = match key.split_once('.') {
            Some((head, member)) => (head, Some(member)),
            None => (key.as_str(), None),
        };
        let attr = schema
            .lookup(head)
            .ok_or_else(|| CodecError::UnknownKey(key.clone()))?;

        match (attr.kind(), member) {
            (AttrKind::Block(nested), Some(member)) => {
                let member_attr = nested
                    .lookup(member)
                    .ok_or_else(|| CodecError::UnknownKey(key.clone()))?;
                let Some(value) = decode_value(member_attr, raw)? else {
                    continue;
                };
                let slot = record
                    .get_mut(attr.name())
                    .and_then(|v| match v {
                        Value::Block(block) => Some(block),
                        _ => None,
                    });
                match slot {
                    Some(block) => {
                        block.insert(member_attr.name(), value);
                    }
                    None => {
                        record.insert(attr.name(), Record::new().with(member_attr.name(), value));
                    }
                }
            }
            (AttrKind::Block(_), None) | (_, Some(_)) => {
                return Err(CodecError::UnknownKey(key.clone()));
            }
            (_, None) => {
                if let Some(value) = decode_value(attr, raw)? {
                    record.insert(attr.name(), value);
                }
            }
        }
    }
    Ok(record)
}
