//! Async client for the Gracer HTTP API.
//!
//! # Overview
//! `GracerClient` groups the endpoints into three namespaces, `ai`, `user`
//! and `file_manager`. Every operation validates its arguments, issues
//! exactly one HTTP request and returns the response body as
//! `serde_json::Value`.
//!
//! # Design
//! - Operations build plain-data `HttpRequest` values; a `Transport`
//!   executes them. `ReqwestTransport` is the default, tests inject fakes.
//! - Errors form a closed set (`ApiError`): validation and configuration
//!   failures never reach the network, everything after dispatch is a
//!   request failure carrying the server's message or the transport's.
//! - No retries, caching or token refresh. Each call stands alone.
//!
//! ```no_run
//! use gracer_core::{ChatMessage, GracerClient};
//!
//! # async fn run() -> Result<(), gracer_core::ApiError> {
//! let client = GracerClient::builder()
//!     .credential("my-api-key")
//!     .base_address("https://gracer.example")
//!     .build();
//! let reply = client.ai().chat(&[ChatMessage::user("Hi")], None).await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod requester;
pub mod transport;
pub mod types;
pub mod validate;

pub use api::{AiApi, FileManagerApi, UserApi, DEFAULT_PATH};
pub use client::{GracerClient, GracerClientBuilder};
pub use config::{ClientConfig, PROTOCOL_VERSION};
pub use error::{ApiError, TransportError, FALLBACK_ERROR_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, Transport};
pub use transport::ReqwestTransport;
pub use types::{ChatMessage, ChatOptions, FileUpload};
