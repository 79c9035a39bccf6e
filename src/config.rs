//! Server configuration and credential handling

use parking_lot::RwLock;
use std::time::Duration;

/// Default extraction endpoint of the ComIDP service
pub const DEFAULT_ENDPOINT: &str = "https://api-service.compdf.com/api/idp/data-extract";

/// Environment variable holding the initial API key
pub const IDPKEY_ENV: &str = "IDPKEY";

/// Environment variable overriding the extraction endpoint
pub const ENDPOINT_ENV: &str = "IDP_ENDPOINT";

/// Configuration for the IDP MCP Server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Extraction endpoint URL
    pub endpoint: String,
    /// Initial API key, typically sourced from the `IDPKEY` environment variable
    pub api_key: String,
    /// Per-request timeout for the extraction call (default: 60s)
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Build a configuration from the process environment.
    ///
    /// `IDPKEY` seeds the credential slot; `IDP_ENDPOINT` overrides the
    /// extraction endpoint when set and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var(IDPKEY_ENV) {
            config.api_key = key;
        }
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }
        config
    }
}

/// Process-wide credential slot for the IDP API key.
///
/// Seeded from configuration at startup. A non-empty key supplied on any
/// tool call overwrites the slot, and the override persists for the rest of
/// the process lifetime. Access goes through a lock so concurrent tool
/// calls cannot observe a torn update.
#[derive(Debug, Default)]
pub struct CredentialStore {
    key: RwLock<String>,
}

impl CredentialStore {
    /// Create a store seeded with `initial` (may be empty).
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            key: RwLock::new(initial.into()),
        }
    }

    /// Apply a caller-supplied override. Empty overrides are ignored, so a
    /// caller cannot blank the credential mid-process.
    pub fn apply_override(&self, key: &str) {
        if !key.is_empty() {
            *self.key.write() = key.to_string();
        }
    }

    /// Current key value.
    pub fn current(&self) -> String {
        self.key.read().clone()
    }

    /// Whether the slot holds no usable key.
    pub fn is_empty(&self) -> bool {
        self.key.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.api_key.is_empty());
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_credential_override_persists() {
        let store = CredentialStore::new("");
        assert!(store.is_empty());

        store.apply_override("secret-key");
        assert_eq!(store.current(), "secret-key");

        // a later override replaces the previous one
        store.apply_override("newer-key");
        assert_eq!(store.current(), "newer-key");
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let store = CredentialStore::new("seeded");
        store.apply_override("");
        assert_eq!(store.current(), "seeded");
    }
}
