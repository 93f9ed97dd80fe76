use crate::config::WebsetsConfig;
use crate::constants::{api, env as env_keys, limits::LOG_BODY_PREVIEW_BYTES, network, protocols::ALLOWED_HTTP};
use crate::errors::ToolError;
use crate::mcp::catalog::HttpMethod;
use crate::services::logger::Logger;
use crate::utils::redact::{redact_headers, redact_text};
use crate::utils::text::status_text;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Failures where no HTTP response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0} ms")]
    Timeout(u64),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("failed to build request: {0}")]
    Build(String),
}

/// One HTTP round trip. Implementations must not retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default transport. Owns a single client so connections are pooled across
/// calls; no other state is shared.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ToolError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(network::TIMEOUT_CONNECTION_MS))
            .build()
            .map_err(|err| ToolError::unknown(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self { client })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn map_reqwest_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(timeout.as_millis() as u64);
    }
    if err.is_builder() {
        return TransportError::Build(err.to_string());
    }
    TransportError::Connect(err.to_string())
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| TransportError::Build(err.to_string()))?;
            let value =
                HeaderValue::from_str(value).map_err(|err| TransportError::Build(err.to_string()))?;
            headers.insert(name, value);
        }

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url.as_str())
            .headers(headers)
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            let bytes =
                serde_json::to_vec(body).map_err(|err| TransportError::Build(err.to_string()))?;
            builder = builder.body(bytes);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| map_reqwest_error(err, request.timeout))?;
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
        let body = response.text().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout(request.timeout.as_millis() as u64)
            } else {
                TransportError::Body(err.to_string())
            }
        })?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Issues exactly one authenticated request per call and turns every
/// non-2xx status or transport failure into a `ToolError`.
#[derive(Clone)]
pub struct RequestExecutor {
    logger: Logger,
    config: WebsetsConfig,
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
}

impl RequestExecutor {
    pub fn new(
        logger: &Logger,
        config: WebsetsConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ToolError> {
        let base_url = parse_base_url(&config.base_url)?;
        Ok(Self {
            logger: logger.child("http"),
            config,
            base_url,
            transport,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn execute(
        &self,
        tool: &str,
        method: HttpMethod,
        url: Url,
        body: Option<Value>,
    ) -> Result<Value, ToolError> {
        let api_key = self.config.resolve_api_key().ok_or_else(|| {
            ToolError::validation("No API key configured").with_hint(format!(
                "Set {} or pass --api-key when starting the server",
                env_keys::API_KEY
            ))
        })?;

        let request_id = uuid::Uuid::new_v4().to_string();
        let mut headers = vec![
            (api::API_KEY_HEADER.to_string(), api_key.clone()),
            ("accept".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), api::USER_AGENT.to_string()),
            (api::REQUEST_ID_HEADER.to_string(), request_id.clone()),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        self.logger.info(
            "HTTP request started",
            Some(&serde_json::json!({
                "tool": tool,
                "requestId": request_id,
                "method": method.as_str(),
                "path": url.path(),
                "headers": redact_headers(&headers),
            })),
        );

        let started = Instant::now();
        let request = HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: Duration::from_millis(self.config.timeout_ms),
        };
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                let message = redact_text(&err.to_string(), usize::MAX, &[api_key.as_str()]);
                self.logger.warn(
                    "HTTP request failed",
                    Some(&serde_json::json!({
                        "tool": tool,
                        "requestId": request_id,
                        "kind": "network",
                        "message": message,
                        "durationMs": started.elapsed().as_millis() as u64,
                    })),
                );
                return Err(ToolError::network(message));
            }
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        let body = parse_body(&response.body);
        if (200..300).contains(&response.status) {
            self.logger.info(
                "HTTP request finished",
                Some(&serde_json::json!({
                    "tool": tool,
                    "requestId": request_id,
                    "status": response.status,
                    "durationMs": duration_ms,
                })),
            );
            return Ok(body);
        }

        let message = remote_error_message(&body, response.status);
        self.logger.warn(
            "HTTP request returned error status",
            Some(&serde_json::json!({
                "tool": tool,
                "requestId": request_id,
                "status": response.status,
                "durationMs": duration_ms,
                "message": message,
                "body": redact_text(&response.body, LOG_BODY_PREVIEW_BYTES, &[api_key.as_str()]),
            })),
        );
        Err(ToolError::remote(response.status, message, body))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ToolError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| ToolError::validation(format!("Invalid base URL '{}': {}", raw, err)))?;
    let scheme = format!("{}:", url.scheme());
    if !ALLOWED_HTTP.contains(&scheme.as_str()) {
        return Err(ToolError::validation(format!(
            "Base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(ToolError::validation(format!("Base URL cannot carry a path: {}", raw)));
    }
    Ok(url)
}

/// Empty bodies decode as null and non-JSON bodies are kept as text.
pub fn parse_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// The body's `error` field when it carries one, then `message`, then the
/// HTTP status text.
pub fn remote_error_message(body: &Value, status: u16) -> String {
    let from_field = |field: &str| -> Option<String> {
        match body.get(field)? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Object(inner) => inner
                .get("message")
                .and_then(|v| v.as_str())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            _ => None,
        }
    };
    from_field("error")
        .or_else(|| from_field("message"))
        .unwrap_or_else(|| status_text(status))
}
