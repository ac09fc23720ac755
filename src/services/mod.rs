pub mod catalog;
pub mod credentials;
pub mod dispatcher;
pub mod endpoint;
pub mod logger;
pub mod tool_executor;
pub mod validation;
