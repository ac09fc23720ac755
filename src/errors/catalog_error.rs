use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce the endpoint list. Logged by the catalog, never returned to callers.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read endpoint catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse endpoint catalog {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
