use crate::config::WebsetsConfig;
use crate::errors::ToolError;
use crate::managers::operation::OperationManager;
use crate::mcp::catalog::{tool_catalog, validate_catalog};
use crate::mcp::envelope::Envelope;
use crate::services::executor::{HttpTransport, ReqwestTransport, RequestExecutor};
use crate::services::logger::Logger;
use crate::services::registry::{ToolHandler, ToolRegistry};
use crate::services::validation::ArgumentValidator;
use serde_json::Value;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub registry: Arc<ToolRegistry>,
}

impl App {
    pub fn initialize(config: WebsetsConfig) -> Result<Self, ToolError> {
        let logger = Logger::new("websets");
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new()?);
        Self::with_transport(config, logger, transport)
    }

    /// Wires the registry over an arbitrary transport. A broken catalog or
    /// base URL fails here, before any call is accepted.
    pub fn with_transport(
        config: WebsetsConfig,
        logger: Logger,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ToolError> {
        let catalog = tool_catalog().as_slice();
        validate_catalog(catalog)?;
        let validator = ArgumentValidator::compile(catalog)?;
        let executor = RequestExecutor::new(&logger, config.clone(), transport)?;

        let mut registry =
            ToolRegistry::new(&logger, validator, catalog, config.enabled_tools.as_deref());
        let operations: Arc<dyn ToolHandler> = Arc::new(OperationManager::new(&logger, executor));
        for name in registry.active_names() {
            registry.register(&name, operations.clone());
        }

        Ok(Self {
            logger,
            registry: Arc::new(registry),
        })
    }

    pub async fn invoke(&self, name: &str, args: Value) -> Envelope {
        self.registry.invoke(name, args).await
    }
}
