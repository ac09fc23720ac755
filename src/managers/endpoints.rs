use crate::constants::listing::{DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT};
use crate::constants::tools;
use crate::errors::ToolError;
use crate::mcp::format;
use crate::services::catalog::EndpointCatalog;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use serde_json::Value;
use std::sync::Arc;

pub const ENDPOINT_TOOLS: &[&str] = &[
    tools::LIST_ENDPOINTS,
    tools::SEARCH_ENDPOINTS,
    tools::GET_ENDPOINT_DETAILS,
    tools::LIST_TAGS,
];

/// Read-only discovery over the endpoint catalog.
#[derive(Clone)]
pub struct EndpointsManager {
    logger: Logger,
    validation: Validation,
    catalog: Arc<EndpointCatalog>,
}

impl EndpointsManager {
    pub fn new(logger: Logger, validation: Validation, catalog: Arc<EndpointCatalog>) -> Self {
        Self {
            logger: logger.child("endpoints"),
            validation,
            catalog,
        }
    }

    pub async fn list_endpoints(&self, args: &Value) -> Result<String, ToolError> {
        let tag = self.validation.ensure_optional_string(args.get("tag"), "tag")?;
        let limit = self
            .validation
            .ensure_limit(args.get("limit"), DEFAULT_LIST_LIMIT)?;

        let mut endpoints = match tag.as_deref() {
            Some(tag) => self.catalog.by_tag(tag).await,
            None => self.catalog.load().await.iter().collect(),
        };
        endpoints.truncate(limit);
        Ok(format::endpoint_list(&endpoints))
    }

    pub async fn search_endpoints(&self, args: &Value) -> Result<String, ToolError> {
        // An empty query is allowed and matches every endpoint.
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::invalid_params("query must be a string"))?
            .to_string();
        let limit = self
            .validation
            .ensure_limit(args.get("limit"), DEFAULT_SEARCH_LIMIT)?;

        let mut endpoints = self.catalog.search(&query).await;
        self.logger.debug(
            "Search finished",
            Some(&serde_json::json!({ "query": query, "matches": endpoints.len() })),
        );
        endpoints.truncate(limit);
        Ok(format::search_results(&query, &endpoints))
    }

    pub async fn endpoint_details(&self, args: &Value) -> Result<String, ToolError> {
        let operation_id =
            self.validation
                .ensure_string(args.get("operationId"), "operationId", true)?;
        let endpoint = self.catalog.require(&operation_id).await?;
        Ok(format::endpoint_details(endpoint))
    }

    pub async fn list_tags(&self) -> Result<String, ToolError> {
        let tags = self.catalog.all_tags().await;
        Ok(format::tag_list(&tags))
    }
}

#[async_trait::async_trait]
impl ToolHandler for EndpointsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        match tool {
            tools::LIST_ENDPOINTS => self.list_endpoints(&args).await,
            tools::SEARCH_ENDPOINTS => self.search_endpoints(&args).await,
            tools::GET_ENDPOINT_DETAILS => self.endpoint_details(&args).await,
            tools::LIST_TAGS => self.list_tags().await,
            other => Err(ToolError::internal(format!(
                "endpoints manager cannot handle tool {}",
                other
            ))),
        }
    }
}
