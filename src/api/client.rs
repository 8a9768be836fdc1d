//! # Transport
//!
//! The engine talks to the server only through [`Transport`]. The production
//! implementation is [`HttpTransport`] (reqwest, with a cookie store so the
//! server session survives across requests); tests script their own.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};

use super::types::{
    FieldValue, HttpMethod, RequestBody, TransportError, TransportRequest, TransportResponse,
};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the name of the transport.
    fn name(&self) -> &str;

    /// Sends one request and returns the raw response, whatever its status.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport rooted at the application origin.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// `timeout` of `None` leaves reqwest's default (no overall timeout).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(TransportError::InvalidUrl(base_url));
        }

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a form action or data-action target against the origin.
    pub fn resolve(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else if target.starts_with('/') {
            format!("{}{}", self.base_url, target)
        } else {
            format!("{}/{}", self.base_url, target)
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Packs form fields into a multipart body. File parts keep their bytes as-is.
fn multipart_form(fields: Vec<(String, FieldValue)>) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = match value {
            FieldValue::Text(text) => form.text(name, text),
            FieldValue::File(file) => {
                let mut part = Part::bytes(file.bytes).file_name(file.file_name);
                if let Some(content_type) = file.content_type {
                    part = part
                        .mime_str(&content_type)
                        .map_err(|e| TransportError::Encoding(e.to_string()))?;
                }
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = self.resolve(&request.url);
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(to_reqwest_method(request.method), &url);
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(fields) => builder.multipart(multipart_form(fields)?),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                TransportError::InvalidUrl(format!("{url}: {e}"))
            } else {
                warn!("Request to {} failed: {}", url, e);
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        debug!("{} {} -> {} ({} bytes)", request.method, url, status, body.len());
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
