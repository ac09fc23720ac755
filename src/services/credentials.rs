use crate::constants::network::DEFAULT_BASE_URL;
use std::fmt;
use std::sync::{Arc, RwLock};

/// Token and base URL used to reach the provider API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub token: String,
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(token: impl Into<String>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            token: token.into(),
            base_url,
        }
    }

    /// Token reduced to its last four characters, for logs.
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("token", &self.masked_token())
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Process-wide credential cell. Writers replace the whole value; readers take a
/// snapshot, so a call in flight keeps the config it started with.
#[derive(Debug, Default)]
pub struct CredentialStore {
    current: RwLock<Option<Arc<ApiConfig>>>,
}

impl CredentialStore {
    pub fn new(initial: Option<ApiConfig>) -> Self {
        Self {
            current: RwLock::new(initial.map(Arc::new)),
        }
    }

    pub fn replace(&self, config: ApiConfig) {
        let mut guard = self.current.write().unwrap_or_else(|err| err.into_inner());
        *guard = Some(Arc::new(config));
    }

    pub fn snapshot(&self) -> Option<Arc<ApiConfig>> {
        self.current
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }

    pub fn is_configured(&self) -> bool {
        self.snapshot().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_base_url_falls_back_to_provider_default() {
        let config = ApiConfig::new("tok", Some("  ".to_string()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        let config = ApiConfig::new("tok", None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn masked_token_keeps_only_the_tail() {
        let config = ApiConfig::new("dop_v1_abcdef123456", None);
        assert_eq!(config.masked_token(), "****3456");
        assert!(!format!("{:?}", config).contains("abcdef"));
        assert_eq!(ApiConfig::new("abc", None).masked_token(), "****");
    }

    #[test]
    fn replace_is_last_write_wins_and_snapshots_are_stable() {
        let store = CredentialStore::new(None);
        assert!(!store.is_configured());

        store.replace(ApiConfig::new("first", None));
        let held = store.snapshot().expect("configured");
        store.replace(ApiConfig::new("second", Some("http://127.0.0.1:9".to_string())));

        assert_eq!(held.token, "first");
        let latest = store.snapshot().expect("configured");
        assert_eq!(latest.token, "second");
        assert_eq!(latest.base_url, "http://127.0.0.1:9");
    }
}
