//! Collection and item path resolution.
//!
//! Responsibilities:
//! - Build item paths from a collection path and an identifier, percent
//!   encoding the identifier so names with spaces or slashes stay one segment.
//! - Recognize device identifiers (`*` followed by hex digits).
//! - Classify natural-key lookups as none, one or many matches.
//!
//! Does NOT handle:
//! - Issuing the list/get calls (see `orchestrator::import`).

use crate::schema::{IdKind, ResourceSchema};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use routeros_client::PropertyBag;
use routeros_client::models::ID_KEY;

/// Characters encoded in an item segment.
///
/// Unreserved characters stay literal, as does `*` so device ids read
/// naturally in logs (`/routing/bgp/template/*2`).
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode one path segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string()
}

/// Whether `token` looks like a device-assigned identifier (`*1A`).
pub fn is_device_id(token: &str) -> bool {
    token
        .strip_prefix('*')
        .is_some_and(|hex| !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Paths for one resource type.
#[derive(Debug, Clone, Copy)]
pub struct ResourcePath<'a> {
    collection: &'a str,
}

impl<'a> ResourcePath<'a> {
    pub fn new(collection: &'a str) -> Self {
        Self { collection }
    }

    pub fn of(resource: &'a ResourceSchema) -> Self {
        Self::new(resource.path())
    }

    pub fn collection(&self) -> &'a str {
        self.collection
    }

    /// Path of a single item, e.g. `/routing/bgp/template/*2`.
    pub fn item(&self, id: &str) -> String {
        format!("{}/{}", self.collection, encode_segment(id))
    }
}

/// Identifier of an item as returned by the device.
///
/// Id-addressed resources use `.id`; name-addressed ones use the natural key.
pub fn identifier_of(resource: &ResourceSchema, bag: &PropertyBag) -> Option<String> {
    let id = match resource.identifier_kind() {
        IdKind::Id => bag.get(ID_KEY),
        IdKind::Name => resource
            .natural_key_attribute()
            .and_then(|attr| bag.get(attr.key())),
    };
    id.filter(|id| !id.is_empty()).cloned()
}

/// Outcome of a natural-key lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    None,
    One(PropertyBag),
    Many(usize),
}

impl Lookup {
    /// Classify `items`, keeping only those whose `key` equals `value` exactly.
    ///
    /// Device-side filtering is not relied upon for exactness.
    pub fn from_matches(items: Vec<PropertyBag>, key: &str, value: &str) -> Self {
        let mut matches: Vec<PropertyBag> = items
            .into_iter()
            .filter(|bag| bag.get(key).is_some_and(|v| v == value))
            .collect();
        match matches.len() {
            0 => Self::None,
            1 => matches.pop().map_or(Self::None, Self::One),
            n => Self::Many(n),
        }
    }
}
