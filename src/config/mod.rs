//! Configuration management.
//!
//! The base API URL and the result ceiling live here rather than as
//! module-level constants so that the query builder and the client stay
//! independently testable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivConfig {
    /// Base URL of the arXiv query API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Hard ceiling on max_results; larger requests are clamped
    #[serde(default = "default_max_results_ceiling")]
    pub max_results_ceiling: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            max_results_ceiling: default_max_results_ceiling(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_api_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_max_results_ceiling() -> usize {
    30
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Environment variable prefix, e.g. ARXIV_HELPER_API_URL
const ENV_PREFIX: &str = "ARXIV_HELPER";

/// Locate a config file: `./arxiv-helper-mcp.toml`, then the platform
/// config directory.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("arxiv-helper-mcp.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("arxiv-helper-mcp").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &PathBuf) -> Result<ArxivConfig, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from environment variables, falling back to
/// defaults when none are set or the values do not deserialize.
pub fn get_config() -> ArxivConfig {
    config::Config::builder()
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .and_then(|settings| settings.try_deserialize())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ArxivConfig::default();
        assert_eq!(config.api_url, "http://export.arxiv.org/api/query");
        assert_eq!(config.max_results_ceiling, 30);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("arxiv-helper-mcp/"));
    }
}
