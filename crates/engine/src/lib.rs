//! Schema-driven reconciliation of RouterOS configuration objects.
//!
//! A resource type is declared once as a [`ResourceSchema`]: its collection
//! path, how items are identified, and a typed [`Schema`] of attributes. The
//! [`Reconciler`] turns desired-state [`Record`]s into the minimal sequence
//! of device calls through any [`routeros_client::DeviceApi`]:
//!
//! - [`codec`] maps records to and from the device's flat property bags
//! - [`path`] resolves collection/item paths and import tokens
//! - [`diff`] computes per-attribute changes and suppresses cosmetic ones
//! - [`orchestrator`] runs create, read, update, delete and import
//! - [`registry`] holds the immutable set of declared resource types

pub mod cancel;
pub mod codec;
pub mod diff;
pub mod duration;
pub mod error;
mod lock;
pub mod orchestrator;
pub mod path;
pub mod registry;
pub mod resources;
pub mod schema;
pub mod value;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use cancel::CancellationToken;
pub use codec::CodecError;
pub use diff::{Change, Diff, Equivalence};
pub use error::{ReconcileError, Result};
pub use orchestrator::{CallOptions, Reconciler, ResourceHandle, ResourceInstance, UpdateOutcome};
pub use path::{Lookup, ResourcePath, is_device_id};
pub use registry::{Registry, RegistryBuilder, RegistryError};
pub use schema::{
    AttrKind, Attribute, DataType, IdKind, ResourceSchema, Schema, ValidationErrors, Validator,
    Violation,
};
pub use value::{Record, Value};
