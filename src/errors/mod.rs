mod catalog_error;
mod mcp_error;
mod tool_error;

pub use catalog_error::CatalogError;
pub use mcp_error::{ErrorCode, McpError};
pub use tool_error::{ToolError, ToolErrorKind};
