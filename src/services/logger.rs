use crate::constants::env as env_keys;
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var(env_keys::LOG_LEVEL).unwrap_or_else(|_| "info".to_string()))
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "debug" => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }

    fn rank(self) -> u8 {
        match self {
            LogLevel::Error => 0,
            LogLevel::Warn => 1,
            LogLevel::Info => 2,
            LogLevel::Debug => 3,
        }
    }

    fn allows(self, other: LogLevel) -> bool {
        other.rank() <= self.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub context: String,
    pub message: String,
    pub meta: Option<Value>,
}

/// Destination for log records. The host decides where records go; the
/// default writes to stderr because stdout carries the protocol.
pub trait LogSink: Send + Sync {
    fn write(&self, record: &LogRecord);
}

pub struct StderrSink;

impl LogSink for StderrSink {
    fn write(&self, record: &LogRecord) {
        let meta_suffix = record
            .meta
            .as_ref()
            .filter(|m| !m.is_null())
            .map(|m| format!(" {}", m))
            .unwrap_or_default();
        eprintln!(
            "[{}] {} [{}] {}{}",
            record.timestamp,
            record.level.as_str(),
            record.context,
            record.message,
            meta_suffix
        );
    }
}

#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.message).collect()
    }
}

impl LogSink for MemorySink {
    fn write(&self, record: &LogRecord) {
        if let Ok(mut guard) = self.records.lock() {
            guard.push(record.clone());
        }
    }
}

#[derive(Clone)]
pub struct Logger {
    context: String,
    level: LogLevel,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(context: &str) -> Self {
        Self::with_sink(context, LogLevel::from_env(), Arc::new(StderrSink))
    }

    pub fn with_sink(context: &str, level: LogLevel, sink: Arc<dyn LogSink>) -> Self {
        Self {
            context: context.to_string(),
            level,
            sink,
        }
    }

    pub fn child(&self, suffix: &str) -> Self {
        let context = if suffix.is_empty() {
            self.context.clone()
        } else {
            format!("{}:{}", self.context, suffix)
        };
        Self {
            context,
            level: self.level,
            sink: self.sink.clone(),
        }
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn log(&self, level: LogLevel, message: &str, meta: Option<&Value>) {
        if !self.level.allows(level) {
            return;
        }
        self.sink.write(&LogRecord {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level,
            context: self.context.clone(),
            message: message.to_string(),
            meta: meta.cloned(),
        });
    }

    pub fn error(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Error, message, meta);
    }

    pub fn warn(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Warn, message, meta);
    }

    pub fn info(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Info, message, meta);
    }

    pub fn debug(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Debug, message, meta);
    }
}
