use serde::{Deserialize, Serialize};

/// Environment variable consulted when no base URL is given explicitly.
pub const BASE_URL_ENV: &str = "BZ_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9000";

/// Where the plot service lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Explicit value first, then the environment, then the local default.
    pub fn resolve(explicit: Option<&str>) -> Self {
        let env_value = std::env::var(BASE_URL_ENV).ok();
        Self::resolve_from(explicit, env_value.as_deref())
    }

    fn resolve_from(explicit: Option<&str>, env_value: Option<&str>) -> Self {
        let chosen = [explicit, env_value]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        Self::new(chosen)
    }

    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
