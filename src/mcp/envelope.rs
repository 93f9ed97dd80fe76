use crate::errors::{ToolError, ToolErrorKind};
use serde::Serialize;
use serde_json::{Map, Value};

/// The single outcome shape returned for every invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ToolErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Computed fields placed next to `data` (summaries, derived flags).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            hint: None,
            error_kind: None,
            status: None,
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn failure(err: &ToolError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.message.clone()),
            details: err.details.clone(),
            hint: err.hint.clone(),
            error_kind: Some(err.kind),
            status: err.status,
            extra: Map::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        !self.success
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|err| {
            serde_json::json!({
                "success": false,
                "error": format!("Failed to serialize result: {}", err),
                "errorKind": ToolErrorKind::Unknown.as_str(),
            })
        })
    }
}

impl From<Result<Envelope, ToolError>> for Envelope {
    fn from(result: Result<Envelope, ToolError>) -> Self {
        match result {
            Ok(envelope) => envelope,
            Err(err) => Envelope::failure(&err),
        }
    }
}
