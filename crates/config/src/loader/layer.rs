//! One source's worth of settings.
//!
//! Profile file, environment and explicit overrides each produce a [`Layer`];
//! the loader stacks them so the order in which sources are read never
//! changes which one wins.

use std::time::Duration;

use secrecy::SecretString;

#[derive(Debug, Clone, Default)]
pub(crate) struct Layer {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub skip_verify: Option<bool>,
    pub timeout: Option<Duration>,
    pub max_retries: Option<usize>,
    pub max_connections: Option<usize>,
    pub operation_timeout: Option<Duration>,
}

impl Layer {
    /// `top` wins wherever it has a value.
    pub fn under(self, top: &Layer) -> Layer {
        Layer {
            base_url: top.base_url.clone().or(self.base_url),
            username: top.username.clone().or(self.username),
            password: top.password.clone().or(self.password),
            skip_verify: top.skip_verify.or(self.skip_verify),
            timeout: top.timeout.or(self.timeout),
            max_retries: top.max_retries.or(self.max_retries),
            max_connections: top.max_connections.or(self.max_connections),
            operation_timeout: top.operation_timeout.or(self.operation_timeout),
        }
    }

    /// Enough to reach a device without consulting a profile.
    pub fn can_connect(&self) -> bool {
        self.base_url.is_some() && self.username.is_some() && self.password.is_some()
    }
}
