use crate::constants::tools;
use crate::errors::ToolError;
use crate::mcp::format;
use crate::services::catalog::EndpointCatalog;
use crate::services::credentials::{ApiConfig, CredentialStore};
use crate::services::dispatcher::RequestDispatcher;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use serde_json::Value;
use std::sync::Arc;

pub const API_TOOLS: &[&str] = &[tools::CONFIGURE, tools::CALL_API];

const NOT_CONFIGURED: &str = "API client not configured. Use configure_digitalocean_api first.";

/// Credential management and generic endpoint invocation.
#[derive(Clone)]
pub struct ApiManager {
    logger: Logger,
    validation: Validation,
    catalog: Arc<EndpointCatalog>,
    credentials: Arc<CredentialStore>,
    dispatcher: RequestDispatcher,
}

impl ApiManager {
    pub fn new(
        logger: Logger,
        validation: Validation,
        catalog: Arc<EndpointCatalog>,
        credentials: Arc<CredentialStore>,
        dispatcher: RequestDispatcher,
    ) -> Self {
        Self {
            logger: logger.child("api"),
            validation,
            catalog,
            credentials,
            dispatcher,
        }
    }

    pub fn configure(&self, args: &Value) -> Result<String, ToolError> {
        let token = self
            .validation
            .ensure_string(args.get("token"), "token", true)
            .map_err(|_| ToolError::invalid_params("API token is required"))?;
        let base_url = self
            .validation
            .ensure_optional_string(args.get("baseUrl"), "baseUrl")?;

        let config = ApiConfig::new(token, base_url);
        self.logger.info(
            "API credentials replaced",
            Some(&serde_json::json!({
                "token": config.masked_token(),
                "base_url": config.base_url,
            })),
        );
        self.credentials.replace(config);
        Ok(format::CONFIGURED_MESSAGE.to_string())
    }

    pub async fn call_api(&self, args: &Value) -> Result<String, ToolError> {
        // Snapshot now: a concurrent configure must not change this call midway.
        let config = self
            .credentials
            .snapshot()
            .ok_or_else(|| ToolError::not_configured(NOT_CONFIGURED))?;

        let operation_id =
            self.validation
                .ensure_string(args.get("operationId"), "operationId", true)?;
        let params = self
            .validation
            .ensure_optional_object(args.get("parameters"), "parameters")?;
        let endpoint = self.catalog.require(&operation_id).await?;

        self.logger.debug(
            "Calling endpoint",
            Some(&serde_json::json!({
                "operation_id": operation_id,
                "method": endpoint.method.as_str(),
                "path": endpoint.path,
                "parameters": params.keys().collect::<Vec<_>>(),
            })),
        );
        let result = self.dispatcher.call(endpoint, &params, &config).await?;
        Ok(format::api_result(&result))
    }
}

#[async_trait::async_trait]
impl ToolHandler for ApiManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        match tool {
            tools::CONFIGURE => self.configure(&args),
            tools::CALL_API => self.call_api(&args).await,
            other => Err(ToolError::internal(format!(
                "api manager cannot handle tool {}",
                other
            ))),
        }
    }
}
