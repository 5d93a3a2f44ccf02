//! Client configuration
//!
//! Configuration can come from a YAML file, from environment variables, or
//! from both (environment wins).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Environment variable holding the backend base URL
pub const ENV_API_URL: &str = "STAR_GALLERY_API_URL";
/// Environment variable holding the gallery page size
pub const ENV_PAGE_SIZE: &str = "STAR_GALLERY_PAGE_SIZE";
/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "STAR_GALLERY_TIMEOUT_SECS";

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Images loaded per gallery page (two to three rows in a typical grid)
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Configuration for talking to the Star Gallery backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Images requested per gallery page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Optional request timeout. `None` uses the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_user_agent() -> String {
    format!("star-gallery/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_secs: None,
            user_agent: default_user_agent(),
            headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at the given base URL, defaults elsewhere
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from defaults plus environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Layer environment variables over this configuration
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Layer overrides from an arbitrary lookup (environment in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!("{ENV_API_URL} overrides base URL");
            self.base_url = url;
        }

        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = raw.trim().parse().map_err(|e| {
                warn!("Invalid {ENV_PAGE_SIZE} value: {e}");
                Error::config(format!("{ENV_PAGE_SIZE} must be a positive integer, got '{raw}'"))
            })?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|e| {
                warn!("Invalid {ENV_TIMEOUT_SECS} value: {e}");
                Error::config(format!("{ENV_TIMEOUT_SECS} must be an integer, got '{raw}'"))
            })?;
            self.timeout_secs = Some(secs);
        }

        self.validate()?;
        Ok(self)
    }

    /// Check the configuration for obvious mistakes
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.page_size == 0 {
            return Err(Error::config("page_size must be at least 1"));
        }
        Ok(())
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.page_size, 12);
        assert!(config.timeout().is_none());
        assert!(config.user_agent.starts_with("star-gallery/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_fills_defaults() {
        let config = ClientConfig::from_yaml("base_url: https://gallery.example.com\n").unwrap();
        assert_eq!(config.base_url, "https://gallery.example.com");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url: http://127.0.0.1:9000\npage_size: 24\ntimeout_secs: 5\nheaders:\n  X-Client: cli"
        )
        .unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.page_size, 24);
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.headers.get("X-Client"), Some(&"cli".to_string()));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::from_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::default()
            .with_overrides(env_of(&[
                (ENV_API_URL, "https://api.example.com"),
                (ENV_PAGE_SIZE, "6"),
                (ENV_TIMEOUT_SECS, "30"),
            ]))
            .unwrap();

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.page_size, 6);
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn test_env_override_invalid_page_size() {
        let err = ClientConfig::default()
            .with_overrides(env_of(&[(ENV_PAGE_SIZE, "many")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_PAGE_SIZE));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClientConfig::with_base_url("ftp://example.com");
        assert!(matches!(config.validate(), Err(Error::Config { .. })));

        config.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));

        config.base_url = DEFAULT_BASE_URL.to_string();
        config.page_size = 0;
        assert!(config.validate().is_err());
    }
}
