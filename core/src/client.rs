//! `GracerClient`: configuration plus the three operation namespaces.
//!
//! # Design
//! The client owns one `Requester` (credential, resolved base address,
//! shared transport) and hands out borrowed namespace views over it, so the
//! header merging and error parsing live in exactly one place. Cloning a
//! client is cheap; the transport sits behind an `Arc`.
//!
//! Construction never fails. A missing credential or base address is only
//! reported when an operation is attempted.

use std::sync::Arc;

use crate::api::{AiApi, FileManagerApi, UserApi};
use crate::config::{ClientConfig, PROTOCOL_VERSION};
use crate::http::Transport;
use crate::requester::Requester;
use crate::transport::ReqwestTransport;

#[derive(Debug, Clone)]
pub struct GracerClient {
    requester: Requester,
}

impl GracerClient {
    /// Build a client from `config` with the default reqwest transport and
    /// no fallback origin.
    pub fn new(config: ClientConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> GracerClientBuilder {
        GracerClientBuilder::default()
    }

    pub fn ai(&self) -> AiApi<'_> {
        AiApi::new(&self.requester)
    }

    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(&self.requester)
    }

    pub fn file_manager(&self) -> FileManagerApi<'_> {
        FileManagerApi::new(&self.requester)
    }

    pub fn credential(&self) -> &str {
        self.requester.credential()
    }

    pub fn base_address(&self) -> &str {
        self.requester.base_address()
    }

    pub fn version(&self) -> &'static str {
        PROTOCOL_VERSION
    }
}

#[derive(Default)]
pub struct GracerClientBuilder {
    config: ClientConfig,
    default_origin: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl GracerClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        self.config.credential = credential.into();
        self
    }

    pub fn base_address(mut self, base_address: impl Into<String>) -> Self {
        self.config.base_address = Some(base_address.into());
        self
    }

    /// Origin of the hosting environment, used when no base address is
    /// configured.
    pub fn default_origin(mut self, origin: impl Into<String>) -> Self {
        self.default_origin = Some(origin.into());
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> GracerClient {
        let base_address = self
            .config
            .base_address
            .filter(|b| !b.is_empty())
            .or(self.default_origin)
            .unwrap_or_default();
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new()));

        GracerClient {
            requester: Requester::new(self.config.credential, base_address, transport),
        }
    }
}
