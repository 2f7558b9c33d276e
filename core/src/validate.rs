//! Argument predicates shared by every API namespace.
//!
//! Each check returns `ApiError::Validation` naming the offending argument.
//! Absent or non-string values cannot be expressed through the typed
//! signatures, so only emptiness and format remain to be checked at runtime.

use crate::error::ApiError;
use crate::types::{ChatMessage, FileUpload};

/// Reject empty strings.
pub fn non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::validation(format!("{field} must be a non-empty string")));
    }
    Ok(())
}

/// Reject paths that do not start with `/`.
pub fn path(field: &str, value: &str) -> Result<(), ApiError> {
    if !value.starts_with('/') {
        return Err(ApiError::validation(format!("{field} must start with '/'")));
    }
    Ok(())
}

/// Reject values that a URL parser would collapse when used as one path
/// segment.
pub fn segment(field: &str, value: &str) -> Result<(), ApiError> {
    if value == "." || value == ".." {
        return Err(ApiError::validation(format!("{field} cannot be '.' or '..'")));
    }
    Ok(())
}

/// Reject file handles that cannot be sent as a multipart part.
pub fn file(value: &FileUpload) -> Result<(), ApiError> {
    if value.file_name.is_empty() {
        return Err(ApiError::validation("file must have a file name"));
    }
    if let Some(content_type) = &value.content_type {
        if !is_mime(content_type) {
            return Err(ApiError::validation(format!(
                "file content type '{content_type}' is not a valid MIME type"
            )));
        }
    }
    Ok(())
}

pub fn messages(value: &[ChatMessage]) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::validation("Messages array cannot be empty"));
    }
    Ok(())
}

/// Credential and base address must both be set before anything is sent.
pub fn config(credential: &str, base_address: &str) -> Result<(), ApiError> {
    if credential.is_empty() {
        return Err(ApiError::configuration("API key is required"));
    }
    if base_address.is_empty() {
        return Err(ApiError::configuration("Host is required"));
    }
    Ok(())
}

// Same parser reqwest applies when the multipart part is built.
fn is_mime(value: &str) -> bool {
    reqwest::multipart::Part::bytes(Vec::new())
        .mime_str(value)
        .is_ok()
}
