//! HTTP seam between the API client and the network.
//!
//! The client builds plain [`HttpRequest`] values and hands them to an
//! [`HttpTransport`]. Production uses [`ReqwestTransport`] (fetch on wasm,
//! hyper + rustls on native); tests plug in a scripted fake.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// One multipart form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime_type: Option<String>,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever the server answered.
///
/// Only failures where no response arrived are errors here; non-2xx
/// statuses come back as normal responses for the client to interpret.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    timeout_ms: Option<u64>,
}

impl ReqwestTransport {
    pub fn new(timeout_ms: Option<u64>) -> ClientResult<Self> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.pool_max_idle_per_host(8).tcp_nodelay(true);
        let client = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self { client, timeout_ms })
    }

    fn build(&self, request: HttpRequest) -> ClientResult<reqwest::RequestBuilder> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut rb = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            rb = rb.header(name.as_str(), value.as_str());
        }

        #[cfg(not(target_arch = "wasm32"))]
        let rb = match self.timeout_ms {
            Some(ms) => rb.timeout(std::time::Duration::from_millis(ms)),
            None => rb,
        };

        let rb = match request.body {
            RequestBody::Empty => rb,
            RequestBody::Json(v) => rb.body(v.to_string()),
            RequestBody::Multipart(parts) => rb.multipart(multipart_form(parts)?),
        };
        Ok(rb)
    }
}

fn multipart_form(parts: Vec<FormPart>) -> ClientResult<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                mime_type,
                bytes,
            } => {
                let mut p = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                if let Some(mime) = mime_type {
                    p = p
                        .mime_str(&mime)
                        .map_err(|e| ClientError::Validation(format!("bad mime type {mime}: {e}")))?;
                }
                form.part(name, p)
            }
        };
    }
    Ok(form)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let rb = self.build(request)?;
        let response = rb
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
