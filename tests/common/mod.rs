#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use websets_mcp::app::App;
use websets_mcp::config::WebsetsConfig;
use websets_mcp::services::executor::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use websets_mcp::services::logger::{LogLevel, Logger, MemorySink};

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const TEST_BASE_URL: &str = "https://api.test.local/websets/v0";
pub const TEST_API_KEY: &str = "test-key-0123456789";

/// Records every request and replays queued outcomes in order. With an
/// empty queue it answers 200 with `{}`.
#[derive(Default)]
pub struct MockTransport {
    requests: StdMutex<Vec<HttpRequest>>,
    queue: StdMutex<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push_raw(status, &body.to_string());
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.queue.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }));
    }

    pub fn push_error(&self, err: TransportError) {
        self.queue.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: "{}".to_string(),
            })
        })
    }
}

pub struct Harness {
    pub app: Arc<App>,
    pub transport: Arc<MockTransport>,
    pub sink: Arc<MemorySink>,
}

pub fn test_config() -> WebsetsConfig {
    WebsetsConfig::default()
        .with_api_key(TEST_API_KEY)
        .with_base_url(TEST_BASE_URL)
}

pub fn harness() -> Harness {
    harness_with(test_config())
}

pub fn harness_with(config: WebsetsConfig) -> Harness {
    let transport = MockTransport::new();
    let sink = Arc::new(MemorySink::new());
    let logger = Logger::with_sink("test", LogLevel::Debug, sink.clone());
    let app = App::with_transport(config, logger, transport.clone()).expect("app must initialize");
    let app = Arc::new(app);
    Harness {
        app,
        transport,
        sink,
    }
}

pub fn query_pairs(request: &HttpRequest) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Smallest argument object that satisfies a schema: required fields only,
/// first enum value, minimum numbers, one array element.
pub fn sample_args(schema: &Value) -> Value {
    let mut out = Map::new();
    let required: Vec<&str> = schema
        .get("required")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();
    for name in required {
        let prop = &schema["properties"][name];
        out.insert(name.to_string(), sample_value(name, prop));
    }
    Value::Object(out)
}

fn sample_value(name: &str, prop: &Value) -> Value {
    if let Some(first) = prop.get("enum").and_then(|v| v.as_array()).and_then(|a| a.first()) {
        return first.clone();
    }
    match prop.get("type").and_then(|v| v.as_str()).unwrap_or("string") {
        "integer" | "number" => Value::from(prop.get("minimum").and_then(|v| v.as_i64()).unwrap_or(1)),
        "boolean" => Value::Bool(true),
        "array" => {
            let count = prop.get("minItems").and_then(|v| v.as_u64()).unwrap_or(1).max(1);
            let item = sample_value(name, &prop["items"]);
            Value::Array((0..count).map(|_| item.clone()).collect())
        }
        "object" => sample_args(prop),
        _ => match prop.get("format").and_then(|v| v.as_str()) {
            Some("uri") => Value::String("https://hooks.example.com/websets".to_string()),
            Some("date-time") => Value::String("2024-05-01T00:00:00Z".to_string()),
            _ => Value::String(format!("{}_1", name)),
        },
    }
}
