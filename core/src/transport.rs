//! reqwest-backed `Transport`.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, Transport};

/// Default transport used by `GracerClient`.
///
/// Non-2xx responses are returned as data; only a failed exchange is an
/// error. No timeout is set unless one is requested.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::with_source(e.to_string(), e))?;
        Ok(Self { client })
    }
}

fn multipart_form(form: MultipartForm) -> Result<reqwest::multipart::Form, TransportError> {
    let mut part = reqwest::multipart::Part::bytes(form.file.bytes).file_name(form.file.file_name);
    if let Some(content_type) = &form.file.content_type {
        part = part
            .mime_str(content_type)
            .map_err(|e| TransportError::with_source(format!("invalid content type: {e}"), e))?;
    }
    let mut out = reqwest::multipart::Form::new().part(form.file_field, part);
    for (name, value) in form.fields {
        out = out.text(name, value);
    }
    Ok(out)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            None => builder,
            Some(RequestBody::Json(body)) => builder.body(body),
            // reqwest sets multipart/form-data with its own boundary.
            Some(RequestBody::Multipart(form)) => builder.multipart(multipart_form(form)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::with_source(e.to_string(), e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(|e| {
            TransportError::with_source(format!("failed to read response body: {e}"), e)
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
