use crate::constants::{api, env as env_keys, network};

/// Startup configuration. Fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct WebsetsConfig {
    /// Explicit API key. When absent the key is read from `EXA_API_KEY` at
    /// call time.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_ms: u64,
    /// Operation allow-list. `None` or empty activates every operation.
    pub enabled_tools: Option<Vec<String>>,
}

impl Default for WebsetsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: api::DEFAULT_BASE_URL.to_string(),
            timeout_ms: network::TIMEOUT_API_REQUEST_MS,
            enabled_tools: None,
        }
    }
}

impl WebsetsConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(base_url) = read_env(env_keys::BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(timeout) = read_env(env_keys::TIMEOUT_MS).and_then(|v| v.parse::<u64>().ok()) {
            if timeout > 0 {
                config.timeout_ms = timeout;
            }
        }
        if let Some(raw) = read_env(env_keys::ENABLED_TOOLS) {
            config.enabled_tools = Some(parse_tool_list(&raw));
        }
        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_enabled_tools(mut self, tools: Vec<String>) -> Self {
        self.enabled_tools = Some(tools);
        self
    }

    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .or_else(|| read_env(env_keys::API_KEY))
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_tool_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !out.iter().any(|existing| existing == name) {
            out.push(name.to_string());
        }
    }
    out
}
