use crate::app::App;
use crate::config::ServerConfig;
use crate::constants::server::{NAME, PROTOCOL_VERSION, VERSION};
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::catalog::{tool_catalog, validate_tool_args};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse, ToolCallParams, ToolCallResult};
use crate::services::tool_executor::ToolOutcome;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": { "name": NAME, "version": VERSION },
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": tool_catalog() })
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, McpError> {
        let params: ToolCallParams = serde_json::from_value(params)
            .map_err(|err| McpError::new(ErrorCode::InvalidParams, err.to_string()))?;
        if params.name.is_empty() {
            return Err(McpError::new(ErrorCode::InvalidParams, "Missing tool name"));
        }
        let args = if params.arguments.is_null() {
            Value::Object(Default::default())
        } else {
            params.arguments
        };

        let outcome = match validate_tool_args(&params.name, &args) {
            Ok(()) => self.app.tool_executor.run(&params.name, args).await,
            Err(err) => ToolOutcome::failure(&err),
        };
        serde_json::to_value(ToolCallResult::from(outcome))
            .map_err(|err| McpError::new(ErrorCode::InternalError, err.to_string()))
    }

    /// Response for one request, or `None` for notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);
        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(request.params).await,
            other => Err(McpError::method_not_found(other)),
        };
        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => JsonRpcResponse::failure(id, err.code.as_i32(), err.message),
        })
    }

    /// Serialized reply for one input line, if the line calls for one.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(trimmed) {
            Err(_) => Some(JsonRpcResponse::failure(
                Value::Null,
                ErrorCode::ParseError.as_i32(),
                "Parse error".to_string(),
            )),
            Ok(parsed) => match serde_json::from_value::<JsonRpcRequest>(parsed) {
                Err(_) => Some(JsonRpcResponse::failure(
                    Value::Null,
                    ErrorCode::InvalidRequest.as_i32(),
                    "Invalid request".to_string(),
                )),
                Ok(request) => self.handle_request(request).await,
            },
        };
        response.map(|r| serde_json::to_string(&r).unwrap_or_default())
    }

    /// Line-delimited JSON-RPC until `reader` reaches EOF.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ToolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut writer = BufWriter::new(writer);
        while let Some(line) = lines.next_line().await? {
            if let Some(payload) = self.handle_line(&line).await {
                writer.write_all(payload.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        self.app.logger.info(
            "DigitalOcean MCP server running on stdio",
            Some(&serde_json::json!({ "version": VERSION })),
        );
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }
}

pub async fn run_stdio(config: ServerConfig) -> Result<(), ToolError> {
    let app = App::initialize(config)?;
    let server = McpServer::new(Arc::new(app));
    server.run_stdio().await
}
