//! Wire models for the RouterOS REST interface.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Flat string-keyed, string-valued map exchanged with the device.
///
/// Keys are device property names (`hold-time`, `input.filter`, `.id`).
pub type PropertyBag = BTreeMap<String, String>;

/// Key under which the device reports an item's identifier.
pub const ID_KEY: &str = ".id";

/// Error body returned by RouterOS, e.g.
/// `{"error":404,"message":"Not Found","detail":"no such item"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceErrorBody {
    pub error: u16,
    pub message: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_error_body_parses() {
        let body: DeviceErrorBody = serde_json::from_str(
            r#"{"error":400,"message":"Bad Request","detail":"unknown parameter hold-tme"}"#,
        )
        .unwrap();
        assert_eq!(body.error, 400);
        assert_eq!(body.detail.as_deref(), Some("unknown parameter hold-tme"));
    }

    #[test]
    fn test_device_error_body_without_detail() {
        let body: DeviceErrorBody =
            serde_json::from_str(r#"{"error":401,"message":"Unauthorized"}"#).unwrap();
        assert_eq!(body.message, "Unauthorized");
        assert!(body.detail.is_none());
    }
}
