use digitalocean_mcp::config::ServerConfig;

#[tokio::main]
async fn main() {
    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(err) => err.exit(),
    };
    if let Err(err) = digitalocean_mcp::mcp::server::run_stdio(config).await {
        eprintln!("digitalocean-mcp: {}", err);
        std::process::exit(1);
    }
}
