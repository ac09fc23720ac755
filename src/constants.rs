pub mod server {
    pub const NAME: &str = "digitalocean-mcp";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PROTOCOL_VERSION: &str = "2025-06-18";
}

pub mod network {
    pub const DEFAULT_BASE_URL: &str = "https://api.digitalocean.com";
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const ALLOWED_SCHEMES: &[&str] = &["http", "https"];
}

pub mod listing {
    pub const DEFAULT_LIST_LIMIT: usize = 50;
    pub const DEFAULT_SEARCH_LIMIT: usize = 20;
    pub const MAX_SUGGESTIONS: usize = 3;
}

pub mod env {
    pub const API_TOKEN: &str = "DIGITALOCEAN_API_TOKEN";
    pub const API_BASE_URL: &str = "DIGITALOCEAN_API_BASE_URL";
    pub const API_TIMEOUT_MS: &str = "DIGITALOCEAN_API_TIMEOUT_MS";
    pub const ENDPOINTS_PATH: &str = "DIGITALOCEAN_ENDPOINTS_PATH";
    pub const LOG_LEVEL: &str = "DIGITALOCEAN_MCP_LOG_LEVEL";
    pub const LOG_LEVEL_FALLBACK: &str = "LOG_LEVEL";
}

pub mod catalog {
    pub const DEFAULT_ENDPOINTS_FILE: &str = "digitalocean_endpoints.json";
}

pub mod tools {
    pub const CONFIGURE: &str = "configure_digitalocean_api";
    pub const LIST_ENDPOINTS: &str = "list_endpoints";
    pub const SEARCH_ENDPOINTS: &str = "search_endpoints";
    pub const GET_ENDPOINT_DETAILS: &str = "get_endpoint_details";
    pub const CALL_API: &str = "call_digitalocean_api";
    pub const LIST_TAGS: &str = "list_tags";
}
