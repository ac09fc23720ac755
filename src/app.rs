use crate::config::ServerConfig;
use crate::errors::ToolError;
use crate::managers::api::{ApiManager, API_TOOLS};
use crate::managers::endpoints::{EndpointsManager, ENDPOINT_TOOLS};
use crate::mcp::catalog::tool_catalog;
use crate::services::catalog::EndpointCatalog;
use crate::services::credentials::CredentialStore;
use crate::services::dispatcher::RequestDispatcher;
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::validation::Validation;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub catalog: Arc<EndpointCatalog>,
    pub credentials: Arc<CredentialStore>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every tool in tool_catalog.json must have a registered handler.")
            .with_details(serde_json::json!({ "missing_tools": missing })))
    }

    pub fn initialize(config: ServerConfig) -> Result<Self, ToolError> {
        let logger = Logger::with_level("digitalocean-mcp", config.log_level);
        let catalog = Arc::new(EndpointCatalog::from_file(
            logger.clone(),
            config.endpoints_path.clone(),
        ));
        Self::with_catalog(config, logger, catalog)
    }

    /// Wire the tools around an existing catalog.
    pub fn with_catalog(
        config: ServerConfig,
        logger: Logger,
        catalog: Arc<EndpointCatalog>,
    ) -> Result<Self, ToolError> {
        let validation = Validation::new();
        let configured_from_env = config.initial_credentials.is_some();
        let credentials = Arc::new(CredentialStore::new(config.initial_credentials));
        let dispatcher = RequestDispatcher::new(logger.clone(), config.timeout_ms)?;

        let endpoints_manager = Arc::new(EndpointsManager::new(
            logger.clone(),
            validation.clone(),
            catalog.clone(),
        ));
        let api_manager = Arc::new(ApiManager::new(
            logger.clone(),
            validation,
            catalog.clone(),
            credentials.clone(),
            dispatcher,
        ));

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        for tool in ENDPOINT_TOOLS {
            handlers.insert(tool.to_string(), endpoints_manager.clone());
        }
        for tool in API_TOOLS {
            handlers.insert(tool.to_string(), api_manager.clone());
        }
        Self::validate_tool_wiring(&handlers)?;

        logger.info(
            "Server initialized",
            Some(&serde_json::json!({
                "catalog": catalog.path().map(|p| p.display().to_string()),
                "configured_from_env": configured_from_env,
                "timeout_ms": config.timeout_ms,
            })),
        );

        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        Ok(Self {
            logger,
            catalog,
            credentials,
            tool_executor,
        })
    }
}
