//! Error types for the Gracer API client.
//!
//! # Design
//! Argument problems are reported before any I/O as `Validation`; a missing
//! credential or base address is `Configuration` and is checked on every
//! call. Everything that happens once a request is dispatched, whether the
//! server answered with a failure status or the exchange never completed,
//! is `Request`. Its `Display` is the bare message so server-supplied text
//! reaches the caller verbatim.

use thiserror::Error;

/// Message used when a failed response carries no usable `error` field.
pub const FALLBACK_ERROR_MESSAGE: &str = "API call failed";

/// Errors returned by every `GracerClient` operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An argument was missing or malformed. No request was sent.
    #[error("{message}")]
    Validation { message: String },

    /// The client has no credential or no base address. No request was sent.
    #[error("{message}")]
    Configuration { message: String },

    /// The request failed: either a non-2xx response (`status` is set) or a
    /// transport failure (`status` is `None`, `source` holds the cause).
    #[error("{message}")]
    Request {
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<TransportError>,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ApiError::Configuration {
            message: message.into(),
        }
    }

    pub fn status_failure(status: u16, message: impl Into<String>) -> Self {
        ApiError::Request {
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ApiError::Configuration { .. })
    }

    /// HTTP status of a failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => *status,
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message }
            | ApiError::Configuration { message }
            | ApiError::Request { message, .. } => message,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Request {
            status: None,
            message: err.message.clone(),
            source: Some(err),
        }
    }
}

/// A failure to complete an HTTP exchange.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
