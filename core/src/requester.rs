//! The single request path shared by every API namespace.
//!
//! # Design
//! A `Call` names what an operation wants (method, endpoint, body, extra
//! headers). `Requester::build` turns it into a fully resolved `HttpRequest`
//! and `parse_response` interprets whatever comes back. Both are pure; only
//! `Requester::send` touches the transport, and it checks the configuration
//! first on every call.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use crate::error::{ApiError, FALLBACK_ERROR_MESSAGE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, Transport};
use crate::validate;

/// Characters escaped when a value is interpolated as one path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b';')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// What one operation asks the requester to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: HttpMethod,
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl Call {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            endpoint: endpoint.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Delete,
            ..Self::get(endpoint)
        }
    }

    pub fn post_json(endpoint: impl Into<String>, body: &Value) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(RequestBody::Json(body.to_string())),
            ..Self::get(endpoint)
        }
    }

    pub fn post_multipart(endpoint: impl Into<String>, form: MultipartForm) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(RequestBody::Multipart(form)),
            ..Self::get(endpoint)
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Append a form-encoded query string to `endpoint`. No `?` is added when
/// there are no pairs.
pub fn with_query<K, V>(endpoint: &str, pairs: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    let query = serializer.finish();
    if query.is_empty() {
        endpoint.to_string()
    } else {
        format!("{endpoint}?{query}")
    }
}

/// Percent-encode `value` for use as a single path segment.
///
/// `.` and `..` are left as they are; URL parsers collapse them (escaped or
/// not), so callers reject them first with `validate::segment`.
pub fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

// At most one slash is dropped, so "/" stays a usable (relative) address.
fn trim_trailing_slash(mut base_address: String) -> String {
    if base_address.len() > 1 && base_address.ends_with('/') {
        base_address.pop();
    }
    base_address
}

/// Shared request-issuing capability injected into every namespace.
#[derive(Clone)]
pub struct Requester {
    credential: String,
    base_address: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Requester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Requester")
            .field("base_address", &self.base_address)
            .field("has_credential", &!self.credential.is_empty())
            .finish_non_exhaustive()
    }
}

impl Requester {
    pub fn new(credential: String, base_address: String, transport: Arc<dyn Transport>) -> Self {
        Self {
            credential,
            base_address: trim_trailing_slash(base_address),
            transport,
        }
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    /// Resolve the URL and merge default headers with the call's own.
    ///
    /// Defaults are `Authorization: Bearer <credential>` and, unless the body
    /// is multipart, `Content-Type: application/json`. Call headers replace
    /// defaults of the same name.
    pub fn build(&self, call: Call) -> HttpRequest {
        let mut headers = vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.credential),
        )];
        if !matches!(call.body, Some(RequestBody::Multipart(_))) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        for (name, value) in call.headers {
            match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
                Some(existing) => existing.1 = value,
                None => headers.push((name, value)),
            }
        }

        HttpRequest {
            method: call.method,
            url: format!("{}{}", self.base_address, call.endpoint),
            headers,
            body: call.body,
        }
    }

    /// Check configuration, dispatch `call` and parse the JSON reply.
    pub async fn send(&self, call: Call) -> Result<Value, ApiError> {
        if let Err(err) = validate::config(&self.credential, &self.base_address) {
            tracing::warn!(endpoint = %call.endpoint, "refusing to send request: {err}");
            return Err(err);
        }

        let request = self.build(call);
        let method = request.method.as_str();
        let url = request.url.clone();
        tracing::debug!(method, url = %url, "sending request");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(method, url = %url, "transport failure: {err}");
                return Err(err.into());
            }
        };

        let result = parse_response(response);
        match &result {
            Ok(_) => tracing::debug!(method, url = %url, "request succeeded"),
            Err(err) => {
                tracing::warn!(method, url = %url, status = ?err.status(), "request failed: {err}")
            }
        }
        result
    }
}

/// Interpret a raw response.
///
/// 2xx bodies must be JSON. Any other status fails with the body's string
/// `error` field, or `FALLBACK_ERROR_MESSAGE` when the body is not JSON or
/// carries no such field.
pub fn parse_response(response: HttpResponse) -> Result<Value, ApiError> {
    if !response.is_success() {
        let message = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
        return Err(ApiError::status_failure(response.status, message));
    }

    serde_json::from_str(&response.body).map_err(|e| ApiError::Request {
        status: Some(response.status),
        message: format!("invalid JSON in response body: {e}"),
        source: None,
    })
}
