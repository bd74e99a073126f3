//! Bearer token sources
//!
//! Tokens are handed to the API client explicitly instead of being read from
//! ambient storage. A [`TokenSource`] is asked for a token before every
//! request; `Ok(None)` sends the request without an Authorization header.

use crate::config::ApiConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// Anonymous requests
pub struct NoAuth;

#[async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}

/// A token obtained elsewhere (login screen, `API_TOKEN`, `--token`)
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(Some(self.0.clone()))
    }
}

/// Token source for the configured `API_TOKEN`, or anonymous when unset
pub fn from_config(config: &ApiConfig) -> Arc<dyn TokenSource> {
    match config.token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => Arc::new(StaticToken::new(token)),
        _ => Arc::new(NoAuth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token() {
        let source = StaticToken::new("abc");
        assert_eq!(source.token().await.unwrap(), Some("abc".to_string()));
        assert_eq!(format!("{:?}", source), "StaticToken(..)");
    }

    #[tokio::test]
    async fn test_from_config_blank_token_is_anonymous() {
        let config = ApiConfig::builder().token("  ").build();
        let source = from_config(&config);
        assert_eq!(source.token().await.unwrap(), None);

        let config = ApiConfig::builder().token("secret").build();
        let source = from_config(&config);
        assert_eq!(source.token().await.unwrap(), Some("secret".to_string()));
    }
}
