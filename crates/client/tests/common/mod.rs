//! Common test utilities for integration tests.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Clients built here retry quickly so retry tests stay fast

use std::time::Duration;

#[allow(unused_imports)]
pub use routeros_client::testing::load_fixture;
#[allow(unused_imports)]
pub use routeros_client::{ClientError, DeviceApi, PropertyBag, RouterOsClient};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use routeros_client::BasicAuth;
use secrecy::SecretString;

/// Client pointed at a mock server with `admin`/`pw` credentials.
#[allow(dead_code)]
pub fn client_for(server: &MockServer, max_retries: usize) -> RouterOsClient {
    RouterOsClient::builder()
        .base_url(server.uri())
        .auth(BasicAuth::new(
            "admin".to_string(),
            SecretString::new("pw".to_string().into()),
        ))
        .max_retries(max_retries)
        .retry_base_delay(Duration::from_millis(10))
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client should build")
}

/// Build a property bag from key/value pairs.
#[allow(dead_code)]
pub fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
