//! HTTP Basic credentials for the RouterOS REST service.
//!
//! RouterOS has no session tokens on its REST interface; every request
//! carries the user's credentials.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

/// Username and password sent with every request.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    username: String,
    password: SecretString,
}

impl BasicAuth {
    pub fn new(username: String, password: SecretString) -> Self {
        Self { username, password }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Attach the `Authorization: Basic` header to a request.
    pub(crate) fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.username, Some(self.password.expose_secret()))
    }
}
