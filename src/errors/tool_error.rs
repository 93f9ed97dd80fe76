use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// Arguments rejected before any request was built.
    Validation,
    RemoteClient,
    RemoteServer,
    /// No response was received (connect failure, timeout, broken body).
    Network,
    Unknown,
}

impl ToolErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolErrorKind::Validation => "validation",
            ToolErrorKind::RemoteClient => "remote_client",
            ToolErrorKind::RemoteServer => "remote_server",
            ToolErrorKind::Network => "network",
            ToolErrorKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub retryable: bool,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
            status: None,
            retryable: matches!(kind, ToolErrorKind::Network | ToolErrorKind::RemoteServer),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Validation, "VALIDATION_ERROR", message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Network, "NETWORK_ERROR", message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Unknown, "UNKNOWN_ERROR", message)
    }

    /// Non-2xx response. 4xx is caller-correctable; everything else is
    /// reported as a server failure.
    pub fn remote(status: u16, message: impl Into<String>, body: Value) -> Self {
        let (kind, code) = if (400..500).contains(&status) {
            (ToolErrorKind::RemoteClient, "REMOTE_CLIENT_ERROR")
        } else {
            (ToolErrorKind::RemoteServer, "REMOTE_SERVER_ERROR")
        };
        let mut err = Self::new(kind, code, message);
        err.status = Some(status);
        if !body.is_null() {
            err.details = Some(body);
        }
        err
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::unknown(err.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::unknown(format!("Unexpected response shape: {}", err))
    }
}
