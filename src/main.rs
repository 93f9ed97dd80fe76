use clap::Parser;
use websets_mcp::config::{parse_tool_list, WebsetsConfig};

/// MCP server exposing the Websets API as schema-validated operations.
#[derive(Debug, Parser)]
#[command(name = "websets-mcp", version)]
struct Cli {
    /// Comma-separated operation names to activate (default: all).
    #[arg(long, value_name = "NAMES")]
    tools: Option<String>,

    /// API key. Falls back to EXA_API_KEY.
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

impl Cli {
    fn into_config(self) -> WebsetsConfig {
        let mut config = WebsetsConfig::from_env();
        if let Some(tools) = self.tools {
            config.enabled_tools = Some(parse_tool_list(&tools));
        }
        if let Some(key) = self.api_key {
            config.api_key = Some(key);
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = self.timeout_ms.filter(|ms| *ms > 0) {
            config.timeout_ms = timeout;
        }
        config
    }
}

#[tokio::main]
async fn main() {
    let config = Cli::parse().into_config();
    if let Err(err) = websets_mcp::mcp::server::run_stdio(config).await {
        eprintln!("websets-mcp: {}", err);
        std::process::exit(1);
    }
}
