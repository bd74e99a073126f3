use crate::config::env::{env, env_optional};
use crate::config::ConfigError;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Backend API configuration
///
/// # Environment Variables
///
/// - `API_BASE_URL` - Base URL the `/produksi` paths are appended to
///   (default: `http://localhost:8000/api`)
/// - `API_TOKEN` - Bearer token sent with every request (default: none)
/// - `API_TIMEOUT_SECS` - Per-request timeout (default: 30)
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env("API_BASE_URL", DEFAULT_BASE_URL.to_string()),
            token: env_optional("API_TOKEN"),
            timeout: Duration::from_secs(env("API_TIMEOUT_SECS", 30u64)),
        }
    }

    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Reject a base URL that is not absolute http(s), or a zero timeout
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(self.base_url()).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Builder for ApiConfig
#[derive(Default)]
pub struct ApiConfigBuilder {
    base_url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl ApiConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Unset fields fall back to the environment
    pub fn build(self) -> ApiConfig {
        let default = ApiConfig::from_env();
        ApiConfig {
            base_url: self.base_url.unwrap_or(default.base_url),
            token: self.token.or(default.token),
            timeout: self.timeout.unwrap_or(default.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ApiConfig::builder().base_url("http://erp.local/api/").build();
        assert_eq!(config.base_url(), "http://erp.local/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let config = ApiConfig::builder().base_url("erp.local/api").build();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl { .. })));

        let config = ApiConfig::builder().base_url("ftp://erp.local").build();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ApiConfig::builder()
            .base_url("http://erp.local")
            .timeout(Duration::ZERO)
            .build();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ApiConfig::builder().token("super-secret").build();
        let shown = format!("{:?}", config);
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("<redacted>"));
    }
}
