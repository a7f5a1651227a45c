//! Declarative resource schemas.
//!
//! Responsibilities:
//! - Describe attributes: type, device key, required/computed flags, default,
//!   validator, equivalence rule and sticky flag.
//! - Describe resource types: collection path, identifier kind, natural key.
//! - Validate records against a schema, collecting every violation.
//!
//! Does NOT handle:
//! - Encoding values for the device (see `codec`).
//! - Registering resource types (see `registry`).
//!
//! Invariants:
//! - Device keys default to the attribute name with `_` replaced by `-`.
//! - Nested block schemas never contain required attributes (checked by
//!   `ResourceSchema::check`).

use crate::diff::Equivalence;
use crate::duration::{self, RosDuration};
use crate::value::{Record, Value};
use std::fmt;
use std::net::Ipv4Addr;

/// Primitive type of a scalar attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    String,
    Bool,
    Int,
}

/// Shape of an attribute's value.
#[derive(Debug, Clone)]
pub enum AttrKind {
    Scalar(DataType),
    /// Ordered, comma-separated on the wire.
    List,
    /// Unordered; encoded in canonical sorted order.
    Set,
    /// Nested attributes flattened to `<block>.<member>` device keys.
    Block(Schema),
}

impl AttrKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(DataType::String) => "string",
            Self::Scalar(DataType::Bool) => "bool",
            Self::Scalar(DataType::Int) => "int",
            Self::List => "list",
            Self::Set => "set",
            Self::Block(_) => "block",
        }
    }
}

/// Value checks applied during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// String must be one of the listed values.
    OneOf(&'static [&'static str]),
    /// Every element of a list or set must be one of the listed values.
    EachOneOf(&'static [&'static str]),
    /// Integer must lie in the inclusive range.
    IntRange(i64, i64),
    /// String must be a dotted IPv4 address.
    Ipv4,
    /// String must be a RouterOS duration.
    Duration,
    /// String must be a RouterOS duration within the inclusive range, or
    /// `infinity`.
    DurationRange(std::time::Duration, std::time::Duration),
}

impl Validator {
    /// Check `value`, returning a human readable reason on rejection.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match (self, value) {
            (Self::OneOf(allowed), Value::String(s)) => {
                if allowed.contains(&s.as_str()) {
                    Ok(())
                } else {
                    Err(format!("expected one of [{}]", allowed.join(", ")))
                }
            }
            (Self::EachOneOf(allowed), Value::List(items)) => check_each(allowed, items.iter()),
            (Self::EachOneOf(allowed), Value::Set(items)) => check_each(allowed, items.iter()),
            (Self::IntRange(min, max), Value::Int(i)) => {
                if (*min..=*max).contains(i) {
                    Ok(())
                } else {
                    Err(format!("expected a value between {min} and {max}"))
                }
            }
            (Self::Ipv4, Value::String(s)) => s
                .parse::<Ipv4Addr>()
                .map(|_| ())
                .map_err(|_| "expected an IPv4 address".to_string()),
            (Self::Duration, Value::String(s)) => duration::parse(s)
                .map(|_| ())
                .ok_or_else(|| "expected a duration such as 3m or 00:03:00".to_string()),
            (Self::DurationRange(min, max), Value::String(s)) => match duration::parse(s) {
                Some(RosDuration::Infinite) => Ok(()),
                Some(RosDuration::Finite(d)) if (*min..=*max).contains(&d) => Ok(()),
                _ => Err(format!(
                    "expected a duration between {}s and {}s, or infinity",
                    min.as_secs(),
                    max.as_secs()
                )),
            },
            (validator, value) => Err(format!(
                "{validator:?} cannot check a {} value",
                value.kind_name()
            )),
        }
    }
}

fn check_each<'a>(
    allowed: &[&str],
    items: impl Iterator<Item = &'a String>,
) -> Result<(), String> {
    let rejected: Vec<&str> = items
        .map(String::as_str)
        .filter(|item| !allowed.contains(item))
        .collect();
    if rejected.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "{} not in [{}]",
            rejected.join(", "),
            allowed.join(", ")
        ))
    }
}

/// One declared attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    device_key: String,
    kind: AttrKind,
    required: bool,
    computed: bool,
    default: Option<Value>,
    validator: Option<Validator>,
    equivalence: Equivalence,
    sticky: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttrKind) -> Self {
        let name = name.into();
        Self {
            device_key: name.replace('_', "-"),
            name,
            kind,
            required: false,
            computed: false,
            default: None,
            validator: None,
            equivalence: Equivalence::Exact,
            sticky: false,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttrKind::Scalar(DataType::String))
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, AttrKind::Scalar(DataType::Bool))
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, AttrKind::Scalar(DataType::Int))
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, AttrKind::List)
    }

    pub fn set(name: impl Into<String>) -> Self {
        Self::new(name, AttrKind::Set)
    }

    pub fn block(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, AttrKind::Block(schema))
    }

    /// Override the device key when it does not follow the kebab-case rule.
    pub fn device_key(mut self, key: impl Into<String>) -> Self {
        self.device_key = key.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value is reported by the device; never diffed unless supplied.
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn equivalence(mut self, equivalence: Equivalence) -> Self {
        self.equivalence = equivalence;
        self
    }

    /// The device refuses to clear this attribute once set.
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.device_key
    }

    pub fn kind(&self) -> &AttrKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_computed(&self) -> bool {
        self.computed
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn validator_rule(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    pub fn equivalence_rule(&self) -> Equivalence {
        self.equivalence
    }

    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    /// Nested schema for block attributes.
    pub fn nested(&self) -> Option<&Schema> {
        match &self.kind {
            AttrKind::Block(schema) => Some(schema),
            _ => None,
        }
    }
}

/// Ordered collection of attributes.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(attributes: impl IntoIterator<Item = Attribute>) -> Self {
        Self {
            attributes: attributes.into_iter().collect(),
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn by_device_key(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.device_key == key)
    }

    /// Find by attribute name, falling back to device key.
    pub fn lookup(&self, key: &str) -> Option<&Attribute> {
        self.get(key).or_else(|| self.by_device_key(key))
    }

    /// Validate `record`, collecting every violation.
    pub fn validate(&self, record: &Record) -> Result<(), ValidationErrors> {
        let mut violations = Vec::new();
        self.collect_violations(record, "", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(violations))
        }
    }

    fn collect_violations(&self, record: &Record, prefix: &str, out: &mut Vec<Violation>) {
        for name in record.names() {
            if self.get(name).is_none() {
                out.push(Violation::unknown(format!("{prefix}{name}")));
            }
        }

        for attr in &self.attributes {
            let path = format!("{prefix}{}", attr.name);
            let Some(value) = record.get(&attr.name) else {
                if attr.required {
                    out.push(Violation::missing(path));
                }
                continue;
            };

            if !value.matches(&attr.kind) {
                out.push(Violation::type_mismatch(path, attr.kind.type_name()));
                continue;
            }

            if let (AttrKind::Block(nested), Value::Block(block)) = (&attr.kind, value) {
                nested.collect_violations(block, &format!("{path}."), out);
                continue;
            }

            for (item, reason) in value.defective_items() {
                out.push(Violation::rejected(path.clone(), item, reason));
            }

            if let Some(validator) = &attr.validator
                && let Err(reason) = validator.check(value)
            {
                out.push(Violation::rejected(path, value.to_string(), reason));
            }
        }
    }
}

/// What is wrong with one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    Unknown,
    TypeMismatch { expected: &'static str },
    Rejected { value: String, reason: String },
}

/// A single validation failure, keyed by dotted attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub attribute: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn missing(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            kind: ViolationKind::Missing,
        }
    }

    pub fn unknown(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            kind: ViolationKind::Unknown,
        }
    }

    pub fn type_mismatch(attribute: impl Into<String>, expected: &'static str) -> Self {
        Self {
            attribute: attribute.into(),
            kind: ViolationKind::TypeMismatch { expected },
        }
    }

    pub fn rejected(
        attribute: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            kind: ViolationKind::Rejected {
                value: value.into(),
                reason: reason.into(),
            },
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "{}: required attribute is missing", self.attribute),
            ViolationKind::Unknown => write!(f, "{}: unknown attribute", self.attribute),
            ViolationKind::TypeMismatch { expected } => {
                write!(f, "{}: expected {expected}", self.attribute)
            }
            ViolationKind::Rejected { value, reason } => {
                write!(f, "{}: invalid value {value:?}, {reason}", self.attribute)
            }
        }
    }
}

/// Non-empty list of violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// How items of a collection are addressed in item paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Device-assigned `.id` such as `*1A`.
    Id,
    /// The natural key value itself.
    Name,
}

/// A resource type: where it lives on the device and what it holds.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    type_name: String,
    path: String,
    id_kind: IdKind,
    natural_key: Option<String>,
    schema: Schema,
}

impl ResourceSchema {
    pub fn new(type_name: impl Into<String>, path: impl Into<String>, schema: Schema) -> Self {
        Self {
            type_name: type_name.into(),
            path: path.into(),
            id_kind: IdKind::Id,
            natural_key: None,
            schema,
        }
    }

    pub fn id_kind(mut self, id_kind: IdKind) -> Self {
        self.id_kind = id_kind;
        self
    }

    /// Attribute used to look items up on import.
    pub fn natural_key(mut self, attribute: impl Into<String>) -> Self {
        self.natural_key = Some(attribute.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn identifier_kind(&self) -> IdKind {
        self.id_kind
    }

    pub fn natural_key_attribute(&self) -> Option<&Attribute> {
        self.natural_key
            .as_deref()
            .and_then(|name| self.schema.get(name))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Structural checks performed once at registration.
    pub fn check(&self) -> Result<(), String> {
        if !self.path.starts_with('/') || self.path.ends_with('/') {
            return Err(format!("collection path {:?} must start with '/' and not end with one", self.path));
        }
        check_attributes(&self.schema, false)?;

        match (&self.natural_key, self.natural_key_attribute()) {
            (Some(name), None) => {
                return Err(format!("natural key {name:?} is not a declared attribute"));
            }
            (Some(name), Some(attr)) if !matches!(attr.kind(), AttrKind::Scalar(DataType::String)) => {
                return Err(format!("natural key {name:?} must be a string attribute"));
            }
            _ => {}
        }
        if self.id_kind == IdKind::Name && self.natural_key.is_none() {
            return Err("name-addressed resources need a natural key".to_string());
        }
        Ok(())
    }
}

fn check_attributes(schema: &Schema, nested: bool) -> Result<(), String> {
    let attrs = schema.attributes();
    for (i, attr) in attrs.iter().enumerate() {
        if attrs[..i].iter().any(|a| a.name == attr.name) {
            return Err(format!("attribute {:?} declared twice", attr.name));
        }
        if attrs[..i].iter().any(|a| a.device_key == attr.device_key) {
            return Err(format!("device key {:?} declared twice", attr.device_key));
        }
        if nested && attr.required {
            return Err(format!("block member {:?} cannot be required", attr.name));
        }
        if let Some(default) = &attr.default
            && !default.matches(&attr.kind)
        {
            return Err(format!(
                "default for {:?} is a {}, expected {}",
                attr.name,
                default.kind_name(),
                attr.kind.type_name()
            ));
        }
        if let AttrKind::Block(inner) = &attr.kind {
            if nested {
                return Err(format!("block {:?} cannot be nested in another block", attr.name));
            }
            check_attributes(inner, true)?;
        }
    }
    Ok(())
}
