use crate::constants::{catalog, env, network};
use crate::services::credentials::ApiConfig;
use crate::services::logger::{LogLevel, Logger};
use clap::Parser;
use std::path::PathBuf;

/// Command line; each flag falls back to its environment variable, then a default.
#[derive(Debug, Parser)]
#[command(
    name = "digitalocean-mcp",
    version,
    about = "MCP server exposing the DigitalOcean REST API as tools"
)]
pub struct Cli {
    /// JSON file holding the endpoint catalog.
    #[arg(long = "endpoints", env = env::ENDPOINTS_PATH, default_value = catalog::DEFAULT_ENDPOINTS_FILE)]
    pub endpoints_path: PathBuf,

    #[arg(long, env = env::API_BASE_URL, default_value = network::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, env = env::API_TIMEOUT_MS, default_value_t = network::TIMEOUT_API_REQUEST_MS)]
    pub timeout_ms: u64,

    /// Strict on the command line; the environment variable is read leniently.
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// Only read from the environment so it never shows up in process listings.
    #[arg(skip)]
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub endpoints_path: PathBuf,
    pub base_url: String,
    pub timeout_ms: u64,
    pub log_level: LogLevel,
    pub initial_credentials: Option<ApiConfig>,
}

impl ServerConfig {
    /// `.env` first (if present), then the process environment and `args`.
    pub fn load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        if let Some(problem) = dotenv_problem(&dotenvy::dotenv()) {
            Logger::new("digitalocean-mcp").child("config").warn(
                "Ignoring unreadable .env file",
                Some(&serde_json::json!({ "error": problem })),
            );
        }
        let mut cli = Cli::try_parse_from(args)?;
        cli.token = std::env::var(env::API_TOKEN).ok();
        Ok(Self::from(cli))
    }

    pub fn load() -> Result<Self, clap::Error> {
        Self::load_from(std::env::args_os())
    }
}

/// A missing `.env` is normal; anything else is worth a warning.
fn dotenv_problem(result: &Result<PathBuf, dotenvy::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(err) if err.not_found() => None,
        Err(err) => Some(err.to_string()),
    }
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        let token = cli.token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let initial_credentials =
            token.map(|token| ApiConfig::new(token, Some(cli.base_url.clone())));
        Self {
            endpoints_path: cli.endpoints_path,
            base_url: cli.base_url,
            timeout_ms: cli.timeout_ms,
            log_level: cli.log_level.unwrap_or_else(LogLevel::from_env),
            initial_credentials,
        }
    }
}
