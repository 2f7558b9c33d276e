//! Client configuration.
//!
//! A `ClientConfig` is plain data. Nothing here reads ambient state except
//! the explicit `from_env` constructor; the fallback origin for a missing
//! base address is handed to the client builder by the caller.

/// Version of the client protocol this SDK speaks.
pub const PROTOCOL_VERSION: &str = "1.0.0";

pub const API_KEY_ENV: &str = "GRACER_API_KEY";
pub const HOST_ENV: &str = "GRACER_HOST";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bearer credential. Empty means "not configured".
    pub credential: String,
    /// Origin all endpoint paths are resolved against.
    pub base_address: Option<String>,
}

impl ClientConfig {
    pub fn new(credential: impl Into<String>, base_address: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            base_address: Some(base_address.into()),
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = credential.into();
        self
    }

    pub fn with_base_address(mut self, base_address: impl Into<String>) -> Self {
        self.base_address = Some(base_address.into());
        self
    }

    /// Read `GRACER_API_KEY` and `GRACER_HOST`. Unset variables leave the
    /// corresponding field at its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            credential: lookup(API_KEY_ENV).unwrap_or_default(),
            base_address: lookup(HOST_ENV).filter(|h| !h.is_empty()),
        }
    }
}
