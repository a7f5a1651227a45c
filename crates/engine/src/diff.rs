//! Attribute-level diffing with equivalence suppression.
//!
//! Responsibilities:
//! - Compare an observed record with a desired one, leaf by leaf, using the
//!   encoded device strings so both sides share one representation.
//! - Decide which attributes the desired state owns (supplied, or optional
//!   with a default, or optional without one meaning "clear it").
//! - Drop changes whose values are equivalent under the attribute's rule,
//!   and removals of sticky attributes the device will not clear.
//!
//! Does NOT handle:
//! - Building the write payload (see `orchestrator::update`).
//!
//! Invariants:
//! - Computed attributes are only compared when the desired record supplies them.
//! - Every equivalence rule is a canonical-key comparison, so it is reflexive,
//!   symmetric and transitive by construction.

use crate::codec::{CodecError, encode_value};
use crate::duration;
use crate::schema::{AttrKind, Attribute, Schema};
use crate::value::{Record, Value};
use tracing::warn;

/// How two encoded values are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Equivalence {
    /// Byte-for-byte.
    #[default]
    Exact,
    /// Durations with the same length are equal (`3m` == `180s` == `00:03:00`).
    /// Text that is not a duration falls back to exact comparison.
    Duration,
    /// ASCII case is ignored.
    CaseInsensitive,
}

impl Equivalence {
    /// Canonical form used for comparison.
    pub fn canonical(&self, raw: &str) -> String {
        match self {
            Self::Exact => raw.to_string(),
            Self::Duration => match duration::parse(raw) {
                Some(parsed) => parsed.canonical(),
                None => format!("text:{raw}"),
            },
            Self::CaseInsensitive => raw.to_ascii_lowercase(),
        }
    }

    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        a == b || self.canonical(a) == self.canonical(b)
    }
}

/// One attribute whose desired and observed values differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Dotted attribute-name path (`input.filter`).
    pub path: String,
    /// Dotted device-key path (`input.filter`, `accept-communities`).
    pub device_key: String,
    /// Desired encoded value; `None` means the attribute should be cleared.
    pub desired: Option<String>,
    /// Observed encoded value; `None` means the device reports nothing.
    pub observed: Option<String>,
    pub equivalence: Equivalence,
    pub sticky: bool,
}

impl Change {
    pub fn is_removal(&self) -> bool {
        self.desired.is_none()
    }
}

/// Set of attribute changes between two records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    changes: Vec<Change>,
}

impl Diff {
    /// Compare `observed` against `desired` under `schema`.
    pub fn compute(schema: &Schema, observed: &Record, desired: &Record) -> Result<Self, CodecError> {
        let mut changes = Vec::new();
        for attr in schema.attributes() {
            match attr.kind() {
                AttrKind::Block(nested) => {
                    let observed_block = observed.get(attr.name()).and_then(Value::as_block);
                    let desired_block = desired.get(attr.name()).and_then(Value::as_block);
                    for member in nested.attributes() {
                        compare_leaf(
                            &mut changes,
                            member,
                            format!("{}.{}", attr.name(), member.name()),
                            format!("{}.{}", attr.key(), member.key()),
                            observed_block.and_then(|b| b.get(member.name())),
                            desired_block.and_then(|b| b.get(member.name())),
                        )?;
                    }
                }
                _ => compare_leaf(
                    &mut changes,
                    attr,
                    attr.name().to_string(),
                    attr.key().to_string(),
                    observed.get(attr.name()),
                    desired.get(attr.name()),
                )?,
            }
        }
        Ok(Self { changes })
    }

    /// Drop cosmetic changes and sticky removals.
    pub fn suppress(self) -> Self {
        let changes = self
            .changes
            .into_iter()
            .filter(|change| match (&change.desired, &change.observed) {
                (Some(desired), Some(observed)) => {
                    !change.equivalence.equivalent(desired, observed)
                }
                (None, Some(observed)) if change.sticky => {
                    warn!(
                        attribute = %change.path,
                        observed = %observed,
                        "Attribute cannot be removed once set; keeping device value"
                    );
                    false
                }
                _ => true,
            })
            .collect();
        Self { changes }
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn get(&self, path: &str) -> Option<&Change> {
        self.changes.iter().find(|c| c.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

fn compare_leaf(
    changes: &mut Vec<Change>,
    attr: &Attribute,
    path: String,
    device_key: String,
    observed: Option<&Value>,
    desired: Option<&Value>,
) -> Result<(), CodecError> {
    let desired = match desired {
        Some(value) => Some(value),
        None if attr.is_computed() => return Ok(()),
        None => attr.default_value(),
    };
    let desired = encode_non_empty(attr, desired)?;
    let observed = encode_non_empty(attr, observed)?;

    if desired != observed {
        changes.push(Change {
            path,
            device_key,
            desired,
            observed,
            equivalence: attr.equivalence_rule(),
            sticky: attr.is_sticky(),
        });
    }
    Ok(())
}

fn encode_non_empty(attr: &Attribute, value: Option<&Value>) -> Result<Option<String>, CodecError> {
    match value {
        Some(value) => {
            let encoded = encode_value(attr, value)?;
            Ok((!encoded.is_empty()).then_some(encoded))
        }
        None => Ok(None),
    }
}
