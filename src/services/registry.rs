use crate::constants::limits::MAX_SUGGESTIONS;
use crate::errors::ToolError;
use crate::mcp::catalog::ToolDef;
use crate::mcp::envelope::Envelope;
use crate::services::logger::Logger;
use crate::services::validation::ArgumentValidator;
use crate::utils::suggest::suggest;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Executes one validated operation. Handlers never see arguments that
/// failed the operation's schema.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, tool: &ToolDef, args: Map<String, Value>) -> Result<Envelope, ToolError>;
}

/// Active operations, their handlers and the shared argument validator.
/// Built once at startup and read-only afterwards.
pub struct ToolRegistry {
    logger: Logger,
    validator: ArgumentValidator,
    tools: Vec<&'static ToolDef>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Activates the operations named in `enabled`, or every operation when
    /// the list is absent or empty. Names that match nothing are logged and
    /// skipped.
    pub fn new(
        logger: &Logger,
        validator: ArgumentValidator,
        catalog: &'static [ToolDef],
        enabled: Option<&[String]>,
    ) -> Self {
        let logger = logger.child("registry");
        let tools: Vec<&'static ToolDef> = match enabled.filter(|names| !names.is_empty()) {
            None => catalog.iter().collect(),
            Some(names) => {
                let known: Vec<String> = catalog.iter().map(|tool| tool.name.clone()).collect();
                for name in names {
                    if !known.contains(name) {
                        logger.warn(
                            "Ignoring unknown operation in allow-list",
                            Some(&serde_json::json!({
                                "name": name,
                                "suggestions": suggest(name, &known, MAX_SUGGESTIONS),
                            })),
                        );
                    }
                }
                catalog
                    .iter()
                    .filter(|tool| names.contains(&tool.name))
                    .collect()
            }
        };
        for tool in &tools {
            logger.debug(
                "Operation registered",
                Some(&serde_json::json!({
                    "name": tool.name,
                    "method": tool.endpoint.method.as_str(),
                    "path": tool.endpoint.path,
                })),
            );
        }
        logger.info(
            "Operation registry ready",
            Some(&serde_json::json!({ "active": tools.len(), "catalog": catalog.len() })),
        );
        Self {
            logger,
            validator,
            tools,
            handlers: HashMap::new(),
        }
    }

    /// Attaches a handler to an active operation. Returns false when the
    /// operation is not active.
    pub fn register(&mut self, name: &str, handler: Arc<dyn ToolHandler>) -> bool {
        if !self.is_active(name) {
            return false;
        }
        self.handlers.insert(name.to_string(), handler);
        true
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.tools.iter().any(|tool| tool.name == name)
    }

    pub fn active_tools(&self) -> &[&'static ToolDef] {
        &self.tools
    }

    pub fn active_names(&self) -> Vec<String> {
        self.tools.iter().map(|tool| tool.name.clone()).collect()
    }

    /// Listing advertised to hosts, in catalog order.
    pub fn list(&self) -> Vec<Value> {
        self.tools.iter().map(|tool| tool.listing()).collect()
    }

    /// Runs one invocation to completion. Every path ends in an envelope.
    pub async fn invoke(&self, name: &str, args: Value) -> Envelope {
        let started = Instant::now();
        let result = self.dispatch(name, args).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => self.logger.info(
                "Tool call finished",
                Some(&serde_json::json!({ "tool": name, "durationMs": duration_ms })),
            ),
            Err(err) => self.logger.warn(
                "Tool call failed",
                Some(&serde_json::json!({
                    "tool": name,
                    "kind": err.kind.as_str(),
                    "message": err.message,
                    "status": err.status,
                    "durationMs": duration_ms,
                })),
            ),
        }
        Envelope::from(result)
    }

    async fn dispatch(&self, name: &str, args: Value) -> Result<Envelope, ToolError> {
        let tool = self
            .tools
            .iter()
            .copied()
            .find(|tool| tool.name == name)
            .ok_or_else(|| self.unknown_tool_error(name))?;
        let handler = self.handlers.get(name).ok_or_else(|| {
            ToolError::unknown(format!("No handler registered for operation '{}'", name))
        })?;
        let args = self.validator.validate(tool, args)?;
        handler.handle(tool, args).await
    }

    fn unknown_tool_error(&self, name: &str) -> ToolError {
        let suggestions = suggest(name, &self.active_names(), MAX_SUGGESTIONS);
        let mut err = ToolError::validation(format!("Unknown operation '{}'", name))
            .with_details(serde_json::json!({ "suggestions": suggestions }));
        if !suggestions.is_empty() {
            err = err.with_hint(format!("Did you mean: {}", suggestions.join(", ")));
        }
        err
    }
}
