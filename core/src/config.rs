//! Connection settings for a catalog.
//!
//! # Design
//! Settings are supplied once, at construction, and never read from files or
//! the environment by the library itself. `CatalogConfig` derives serde so an
//! embedding application can load it from whatever configuration source it
//! already uses; missing fields fall back to `#[serde(default)]` values. The
//! password is neither serialized nor shown by `Debug`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for a GeoServer catalog.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Base endpoint, e.g. `http://localhost:8080/geoserver/`.
    pub server_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    /// Seconds to wait for response headers.
    #[serde(default = "default_response_header_timeout")]
    pub response_header_timeout_secs: u64,
}

fn default_response_header_timeout() -> u64 {
    5
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("response_header_timeout_secs", &self.response_header_timeout_secs)
            .finish()
    }
}

impl CatalogConfig {
    pub fn new(server_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            username: username.into(),
            password: password.into(),
            response_header_timeout_secs: default_response_header_timeout(),
        }
    }

    pub fn with_response_header_timeout(mut self, timeout: Duration) -> Self {
        self.response_header_timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn response_header_timeout(&self) -> Duration {
        Duration::from_secs(self.response_header_timeout_secs)
    }

    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}
