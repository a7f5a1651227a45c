//! Errors returned by reconciliation calls.
//!
//! Every variant carries the collection or item path the call targeted and,
//! once known, the item identifier, so callers can report failures without
//! extra bookkeeping.

use crate::codec::CodecError;
use crate::schema::ValidationErrors;
use routeros_client::ClientError;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;

fn at(path: &str, id: &Option<String>) -> String {
    match id {
        Some(id) => format!("{path} (id {id})"),
        None => path.to_string(),
    }
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The desired record does not satisfy the schema. No device call was made.
    #[error("Validation failed for {}: {errors}", at(.path, .id))]
    Validation {
        path: String,
        id: Option<String>,
        errors: ValidationErrors,
    },

    /// A device response (or desired value) could not be converted.
    #[error("Codec error at {}: {source}", at(.path, .id))]
    Codec {
        path: String,
        id: Option<String>,
        #[source]
        source: CodecError,
    },

    /// The addressed item does not exist.
    #[error("Not found: {}", at(.path, .id))]
    NotFound { path: String, id: Option<String> },

    /// A natural-key lookup matched more than one item.
    #[error("{count} items at {path} have {key}={value:?}; import by id instead")]
    AmbiguousKey {
        path: String,
        id: Option<String>,
        key: String,
        value: String,
        count: usize,
    },

    /// The device call failed.
    #[error("Device error at {}: {source}", at(.path, .id))]
    Device {
        path: String,
        id: Option<String>,
        #[source]
        source: ClientError,
    },

    /// The caller cancelled the operation.
    #[error("Cancelled: {}", at(.path, .id))]
    Cancelled { path: String, id: Option<String> },
}

impl ReconcileError {
    /// Collection or item path the failing call targeted.
    pub fn path(&self) -> &str {
        match self {
            Self::Validation { path, .. }
            | Self::Codec { path, .. }
            | Self::NotFound { path, .. }
            | Self::AmbiguousKey { path, .. }
            | Self::Device { path, .. }
            | Self::Cancelled { path, .. } => path,
        }
    }

    /// Item identifier, when one was known at the time of failure.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Validation { id, .. }
            | Self::Codec { id, .. }
            | Self::NotFound { id, .. }
            | Self::AmbiguousKey { id, .. }
            | Self::Device { id, .. }
            | Self::Cancelled { id, .. } => id.as_deref(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Device failure that triggered this error, if any.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Device { source, .. } => Some(source.root_cause()),
            _ => None,
        }
    }

    /// Map a device error, turning `NotFound` into the engine variant.
    pub(crate) fn from_device(path: &str, id: Option<&str>, source: ClientError) -> Self {
        if source.root_cause().is_not_found() {
            return Self::NotFound {
                path: path.to_string(),
                id: id.map(str::to_string),
            };
        }
        Self::Device {
            path: path.to_string(),
            id: id.map(str::to_string),
            source,
        }
    }

    pub(crate) fn codec(path: &str, id: Option<&str>, source: CodecError) -> Self {
        Self::Codec {
            path: path.to_string(),
            id: id.map(str::to_string),
            source,
        }
    }
}
