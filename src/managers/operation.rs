use crate::errors::ToolError;
use crate::managers::{exports, items};
use crate::mcp::catalog::{OperationKind, ToolDef};
use crate::mcp::envelope::Envelope;
use crate::services::executor::RequestExecutor;
use crate::services::logger::Logger;
use crate::services::pagination::{normalize_page, PatternFilter};
use crate::services::registry::ToolHandler;
use crate::utils::path_template::resolve_url;
use crate::utils::query::{append_query, build_request_parts};
use serde_json::{Map, Value};
use url::Url;

/// Handler shared by every catalog operation: resolve, send once, then
/// shape the response according to the operation kind.
#[derive(Clone)]
pub struct OperationManager {
    logger: Logger,
    executor: RequestExecutor,
}

impl OperationManager {
    pub fn new(logger: &Logger, executor: RequestExecutor) -> Self {
        Self {
            logger: logger.child("operations"),
            executor,
        }
    }

    /// Full request URL (path and query) plus the optional JSON body.
    pub fn build_request(
        &self,
        tool: &ToolDef,
        args: &Map<String, Value>,
    ) -> Result<(Url, Option<Value>), ToolError> {
        let mut url = resolve_url(self.executor.base_url(), &tool.endpoint.path, args)?;
        let parts = build_request_parts(&tool.endpoint, args);
        append_query(&mut url, &parts.query);
        Ok((url, parts.body))
    }
}

#[async_trait::async_trait]
impl ToolHandler for OperationManager {
    async fn handle(&self, tool: &ToolDef, args: Map<String, Value>) -> Result<Envelope, ToolError> {
        let filter = match tool.endpoint.kind {
            OperationKind::SearchItems => PatternFilter::from_args(&args)?,
            _ => PatternFilter::default(),
        };
        let (url, body) = self.build_request(tool, &args)?;
        self.logger.debug(
            "Dispatching operation",
            Some(&serde_json::json!({"tool": tool.name, "kind": tool.endpoint.kind})),
        );
        let response = self
            .executor
            .execute(&tool.name, tool.endpoint.method, url, body)
            .await?;

        match tool.endpoint.kind {
            OperationKind::Resource => Ok(Envelope::ok(response)),
            OperationKind::List => {
                let page = normalize_page(&self.logger, &tool.name, response)?;
                Ok(Envelope::ok(serde_json::to_value(page)?))
            }
            OperationKind::SearchItems => {
                items::search_envelope(&self.logger, &tool.name, response, &filter)
            }
            OperationKind::Batch => Ok(items::batch_envelope(tool, &args, response)),
            OperationKind::ExportList => {
                exports::list_envelope(&self.logger, &tool.name, response)
            }
            OperationKind::ExportGet => Ok(exports::get_envelope(response)),
        }
    }
}
