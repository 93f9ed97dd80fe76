pub mod network {
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const TIMEOUT_CONNECTION_MS: u64 = 5_000;
}

pub mod api {
    pub const DEFAULT_BASE_URL: &str = "https://api.exa.ai/websets/v0";
    pub const API_KEY_HEADER: &str = "x-api-key";
    pub const REQUEST_ID_HEADER: &str = "x-request-id";
    pub const USER_AGENT: &str = concat!("websets-mcp/", env!("CARGO_PKG_VERSION"));
}

pub mod env {
    pub const API_KEY: &str = "EXA_API_KEY";
    pub const BASE_URL: &str = "WEBSETS_BASE_URL";
    pub const TIMEOUT_MS: &str = "WEBSETS_TIMEOUT_MS";
    pub const ENABLED_TOOLS: &str = "WEBSETS_ENABLED_TOOLS";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

pub mod limits {
    pub const MAX_PATTERN_LENGTH: usize = 512;
    pub const MAX_SCHEMA_ERRORS: usize = 10;
    pub const MAX_SUGGESTIONS: usize = 3;
    pub const LOG_BODY_PREVIEW_BYTES: usize = 512;
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http:", "https:"];
}
