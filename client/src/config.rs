//! Endpoint configuration.

use std::env;

/// Environment variable consulted by [`ApiConfig::from_env`].
pub const API_URL_ENV: &str = "TASK_API_URL";

/// Service root used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Versioned prefix; every resource path hangs off this.
const API_PREFIX: &str = "/api/v1";

/// Root URL of the task service. Paths handed to [`endpoint`] are relative
/// to the versioned prefix, so callers write `/tasks`, not
/// `/api/v1/tasks`.
///
/// [`endpoint`]: ApiConfig::endpoint
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// A trailing slash on `base_url` is trimmed so joining cannot produce
    /// `//api/v1`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read the root URL from `TASK_API_URL`, falling back to the default.
    pub fn from_env() -> Self {
        let base = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base)
    }

    /// Absolute URL for an API-relative path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
