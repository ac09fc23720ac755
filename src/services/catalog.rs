use crate::constants::listing::MAX_SUGGESTIONS;
use crate::errors::{CatalogError, ToolError};
use crate::services::endpoint::EndpointDescriptor;
use crate::services::logger::Logger;
use crate::utils::suggest::suggest;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

/// Endpoint descriptors, read once and kept for the life of the process.
///
/// The first `load` reads the catalog file; concurrent first callers wait on the
/// same read. A failed read degrades to an empty catalog and is not cached, so a
/// later call tries again.
pub struct EndpointCatalog {
    logger: Logger,
    path: Option<PathBuf>,
    endpoints: OnceCell<Vec<EndpointDescriptor>>,
}

impl EndpointCatalog {
    pub fn from_file(logger: Logger, path: impl Into<PathBuf>) -> Self {
        Self {
            logger: logger.child("catalog"),
            path: Some(path.into()),
            endpoints: OnceCell::new(),
        }
    }

    /// A catalog that is already loaded; never touches the filesystem.
    pub fn from_endpoints(logger: Logger, endpoints: Vec<EndpointDescriptor>) -> Self {
        Self {
            logger: logger.child("catalog"),
            path: None,
            endpoints: OnceCell::from(endpoints),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn load(&self) -> &[EndpointDescriptor] {
        match self.endpoints.get_or_try_init(|| self.read_catalog()).await {
            Ok(endpoints) => endpoints.as_slice(),
            Err(err) => {
                self.logger.error(
                    "Failed to load endpoints",
                    Some(&serde_json::json!({ "error": err.to_string() })),
                );
                &[]
            }
        }
    }

    async fn read_catalog(&self) -> Result<Vec<EndpointDescriptor>, CatalogError> {
        let Some(path) = self.path.clone() else {
            return Ok(Vec::new());
        };
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| CatalogError::Read {
                path: path.clone(),
                source,
            })?;
        let endpoints: Vec<EndpointDescriptor> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.clone(),
                source,
            })?;
        self.logger.info(
            "Loaded endpoint catalog",
            Some(&serde_json::json!({
                "path": path.display().to_string(),
                "endpoints": endpoints.len(),
            })),
        );
        Ok(endpoints)
    }

    pub async fn find_by_id(&self, operation_id: &str) -> Option<&EndpointDescriptor> {
        self.load()
            .await
            .iter()
            .find(|endpoint| endpoint.operation_id == operation_id)
    }

    /// Like `find_by_id`, but an unknown id is a `NotFound` error with suggestions.
    pub async fn require(&self, operation_id: &str) -> Result<&EndpointDescriptor, ToolError> {
        if let Some(endpoint) = self.find_by_id(operation_id).await {
            return Ok(endpoint);
        }
        let err = ToolError::not_found(format!("Endpoint not found: {}", operation_id));
        let similar = self.similar_ids(operation_id).await;
        if similar.is_empty() {
            Err(err)
        } else {
            Err(err.with_hint(format!("Did you mean: {}", similar.join(", "))))
        }
    }

    /// Case-insensitive substring match over operation id, summary, description and tags.
    pub async fn search(&self, query: &str) -> Vec<&EndpointDescriptor> {
        let needle = query.to_lowercase();
        self.load()
            .await
            .iter()
            .filter(|endpoint| endpoint.matches_lowercase(&needle))
            .collect()
    }

    /// Exact, case-sensitive tag membership.
    pub async fn by_tag(&self, tag: &str) -> Vec<&EndpointDescriptor> {
        self.load()
            .await
            .iter()
            .filter(|endpoint| endpoint.has_tag(tag))
            .collect()
    }

    pub async fn all_tags(&self) -> Vec<String> {
        let tags: BTreeSet<&str> = self
            .load()
            .await
            .iter()
            .flat_map(|endpoint| endpoint.tags.iter().map(String::as_str))
            .collect();
        tags.into_iter().map(str::to_string).collect()
    }

    /// Operation ids that look like `operation_id`, closest first.
    pub async fn similar_ids(&self, operation_id: &str) -> Vec<String> {
        let ids: Vec<String> = self
            .load()
            .await
            .iter()
            .map(|endpoint| endpoint.operation_id.clone())
            .collect();
        suggest(operation_id, &ids, MAX_SUGGESTIONS)
    }
}
