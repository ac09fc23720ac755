use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{ToolError, ToolErrorKind};
use crate::services::logger::Logger;
use crate::utils::suggest::suggest;

/// A group of tools served by one manager. `tool` is the name the caller used.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, tool: &str, args: Value) -> Result<String, ToolError>;
}

/// What the caller gets back: always text, failures flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    pub fn failure(error: &ToolError) -> Self {
        Self {
            text: error.to_report(),
            is_error: true,
        }
    }
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub async fn execute(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        let Some(handler) = self.handlers.get(tool) else {
            let candidates: Vec<String> = self.handlers.keys().cloned().collect();
            let suggestions = suggest(tool, &candidates, 3);
            let err = ToolError::invalid_params(format!("Unknown tool: {}", tool));
            return Err(if suggestions.is_empty() {
                err
            } else {
                err.with_hint(format!("Did you mean: {}", suggestions.join(", ")))
            });
        };
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        handler.handle(tool, args).await
    }

    /// Run a tool and flatten any failure into the `Error: ...` report.
    pub async fn run(&self, tool: &str, args: Value) -> ToolOutcome {
        let call_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.logger.debug(
            "Tool call started",
            Some(&serde_json::json!({ "call_id": call_id, "tool": tool })),
        );

        let result = self.execute(tool, args).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(text) => {
                self.logger.debug(
                    "Tool call finished",
                    Some(&serde_json::json!({
                        "call_id": call_id,
                        "tool": tool,
                        "duration_ms": duration_ms,
                    })),
                );
                ToolOutcome::success(text)
            }
            Err(err) => {
                let meta = serde_json::json!({
                    "call_id": call_id,
                    "tool": tool,
                    "duration_ms": duration_ms,
                    "code": err.code,
                    "message": err.message,
                });
                if err.kind == ToolErrorKind::Internal {
                    self.logger.error("Tool call failed", Some(&meta));
                } else {
                    self.logger.warn("Tool call failed", Some(&meta));
                }
                ToolOutcome::failure(&err)
            }
        }
    }
}
