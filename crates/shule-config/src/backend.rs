//! School backend configuration.
//!
//! - `SHULE_BACKEND_URL`: Base URL of the school API (default: `http://localhost:8000`).
//!   `memory://` keeps committed records in process instead.
//! - `SHULE_BACKEND_TOKEN`: Bearer token sent with every request (default: unset)
//! - `SHULE_BACKEND_TIMEOUT_SECS`: Request timeout in seconds (default: 10)

use std::time::Duration;

pub const IN_MEMORY_BACKEND: &str = "memory://";

#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Self::from_source(crate::env_var)
    }

    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: get("SHULE_BACKEND_URL")
                .map(|v| match v.trim() {
                    IN_MEMORY_BACKEND => IN_MEMORY_BACKEND.to_string(),
                    url => url.trim_end_matches('/').to_string(),
                })
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            api_token: get("SHULE_BACKEND_TOKEN").filter(|v| !v.trim().is_empty()),
            timeout: Duration::from_secs(
                get("SHULE_BACKEND_TIMEOUT_SECS")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(10),
            ),
        }
    }

    /// Config for a process-local backend.
    pub fn in_memory() -> Self {
        Self {
            base_url: IN_MEMORY_BACKEND.to_string(),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.base_url == IN_MEMORY_BACKEND
    }

    /// Endpoint that accepts new school records.
    pub fn schools_url(&self) -> String {
        format!("{}/api/schools", self.base_url)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::from_source(|_| None)
    }
}

// The token never reaches logs.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
