//! Client configuration with YAML support

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use url::Url;

/// Base URL of the public air quality API
pub const DEFAULT_BASE_URL: &str = "https://api.waqi.info/";

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("aqi-client/", env!("CARGO_PKG_VERSION"));

/// AQI client configuration
///
/// Meant to be embedded in an application's own configuration file, or
/// constructed programmatically via [`ClientConfig::builder`].
///
/// ```yaml
/// base_url: "https://api.waqi.info/"
/// user_agent: "my-dashboard/1.0"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `User-Agent` header value; `null` disables the header
    #[serde(default = "default_user_agent")]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> Option<String> {
    Some(DEFAULT_USER_AGENT.to_string())
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Create a builder for programmatic configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Parse and validate the base URL
    ///
    /// The URL must be absolute and usable as a base for relative paths.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(url)
    }

    /// Validate the user agent as a header value
    pub fn parsed_user_agent(&self) -> Result<Option<HeaderValue>, ConfigError> {
        self.user_agent
            .as_deref()
            .map(|agent| {
                HeaderValue::from_str(agent)
                    .map_err(|_| ConfigError::InvalidUserAgent(agent.to_string()))
            })
            .transpose()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the `User-Agent` header value
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Send requests without a `User-Agent` header
    pub fn no_user_agent(mut self) -> Self {
        self.config.user_agent = None;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid user agent: {0:?}")]
    InvalidUserAgent(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.waqi.info/");
        assert_eq!(config.user_agent.as_deref(), Some(DEFAULT_USER_AGENT));
        assert!(DEFAULT_USER_AGENT.starts_with("aqi-client/"));
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
base_url: "http://localhost:8080/api/"
user_agent: "dashboard/2.1"
"#;

        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api/");
        assert_eq!(config.user_agent.as_deref(), Some("dashboard/2.1"));
    }

    #[test]
    fn test_yaml_missing_fields_use_defaults() {
        let config = ClientConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_yaml_null_user_agent() {
        let config = ClientConfig::from_yaml("user_agent: null").unwrap();
        assert_eq!(config.user_agent, None);
        assert_eq!(config.parsed_user_agent().unwrap(), None);
    }

    #[test]
    fn test_json_parsing() {
        let config = ClientConfig::from_json(r#"{"base_url": "https://example.org/"}"#).unwrap();
        assert_eq!(config.base_url, "https://example.org/");
        assert_eq!(config.user_agent.as_deref(), Some(DEFAULT_USER_AGENT));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ClientConfig::builder()
            .base_url("http://127.0.0.1:9000/")
            .no_user_agent()
            .build();
        let parsed = ClientConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:9080/")
            .user_agent("probe/0.1")
            .build();

        assert_eq!(config.base_url, "http://localhost:9080/");
        assert_eq!(config.user_agent.as_deref(), Some("probe/0.1"));
    }

    #[test]
    fn test_invalid_base_url() {
        let relative = ClientConfig::builder().base_url("feed/here/").build();
        assert!(matches!(
            relative.parsed_base_url(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let opaque = ClientConfig::builder().base_url("mailto:aqi@example.org").build();
        assert!(matches!(
            opaque.parsed_base_url(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_invalid_user_agent() {
        let config = ClientConfig::builder().user_agent("bad\nagent").build();
        assert!(matches!(
            config.parsed_user_agent(),
            Err(ConfigError::InvalidUserAgent(_))
        ));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = ClientConfig::from_yaml("base_url: [unterminated");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
