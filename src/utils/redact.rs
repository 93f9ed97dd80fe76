use crate::utils::text::truncate_utf8_prefix;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

const DEFAULT_REDACTION: &str = "[REDACTED]";
const INLINE_REDACTION: &str = "***REDACTED***";

static SENSITIVE_HEADER_KEYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "authorization",
        "proxy-authorization",
        "x-api-key",
        "x-auth-token",
        "x-access-token",
    ]
    .into_iter()
    .collect()
});

static INLINE_REDACTION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\b(Bearer)\s+([A-Za-z0-9._~-]{10,})\b").expect("inline redaction regex"),
            "$1 ***REDACTED***",
        ),
        (
            Regex::new(r#"\b(api[_-]?key|x-api-key|token|secret)\b\s*([:=])\s*([^\s"'`,}]+)"#)
                .expect("inline redaction regex"),
            "$1$2***REDACTED***",
        ),
    ]
});

pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADER_KEYS.contains(name.trim().to_lowercase().as_str())
}

/// Masks key-like substrings and any of the `extra` literal secrets, then
/// caps the result at `max_bytes`.
pub fn redact_text(value: &str, max_bytes: usize, extra: &[&str]) -> String {
    let mut out = value.to_string();
    for (re, replacement) in INLINE_REDACTION_PATTERNS.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, *replacement).to_string();
        }
    }
    for raw in extra {
        let needle = raw.trim();
        if needle.len() < 6 {
            continue;
        }
        out = out.replace(needle, INLINE_REDACTION);
    }
    if out.len() <= max_bytes {
        return out;
    }
    format!("{}...", truncate_utf8_prefix(&out, max_bytes))
}

/// Header list rendered for logs. Credential headers never keep their value.
pub fn redact_headers(headers: &[(String, String)]) -> Value {
    let mut out = serde_json::Map::new();
    for (name, value) in headers {
        let rendered = if is_sensitive_header(name) {
            DEFAULT_REDACTION.to_string()
        } else {
            value.clone()
        };
        out.insert(name.clone(), Value::String(rendered));
    }
    Value::Object(out)
}
