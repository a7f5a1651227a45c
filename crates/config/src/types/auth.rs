//! Login material for the RouterOS REST service.
//!
//! RouterOS authenticates every REST request with HTTP Basic credentials of a
//! local user. Passwords stay wrapped in [`SecretString`] from the moment they
//! are read; a profile may instead name a system keyring entry.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Keyring service under which profile passwords are looked up.
pub const KEYRING_SERVICE: &str = "routeros-reconcile";

/// A RouterOS user and its password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Password as written in a profile: inline, or a keyring account name.
///
/// ```json
/// "password": "hunter2"
/// "password": { "keyring_account": "core-1-admin" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SecureValue {
    Keyring { keyring_account: String },
    Plain(#[serde(serialize_with = "expose", deserialize_with = "conceal")] SecretString),
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn conceal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(|s| SecretString::new(s.into()))
}

impl SecureValue {
    /// The password, reading the keyring when the profile points there.
    pub fn resolve(&self) -> Result<SecretString, keyring::Error> {
        match self {
            Self::Plain(secret) => Ok(secret.clone()),
            Self::Keyring { keyring_account } => keyring::Entry::new(KEYRING_SERVICE, keyring_account)?
                .get_password()
                .map(|password| SecretString::new(password.into())),
        }
    }
}
