//! Configuration loading
//!
//! - `.env` files are loaded with environment-based precedence
//! - typed config structs are built from the environment, with builders for
//!   overrides
//! - the result is returned to the caller and passed along explicitly; there
//!   is no global config store
//!
//! # Example
//!
//! ```rust,no_run
//! use produksi::Config;
//!
//! let config = Config::init(std::path::Path::new(".")).expect("valid config");
//! println!("API at {}", config.api.base_url());
//! ```

pub mod env;
pub mod providers;

pub use env::{env, env_flag, env_optional, load_dotenv, Environment};
pub use providers::{ApiConfig, ApiConfigBuilder, AppConfig};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("API timeout must be greater than zero")]
    InvalidTimeout,
}

/// Loaded configuration for one process
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub api: ApiConfig,
    /// `.env` files that were read, most specific first
    pub loaded_files: Vec<PathBuf>,
}

impl Config {
    /// Load `.env` files under `project_root` and build the typed configs
    ///
    /// Call once at startup and hand the result to whatever needs it.
    pub fn init(project_root: &Path) -> Result<Self, ConfigError> {
        let (environment, loaded_files) = env::load_dotenv(project_root);
        debug!(%environment, files = ?loaded_files, "loaded dotenv files");
        Self::from_env(loaded_files)
    }

    /// Build from the current process environment without reading files
    pub fn from_env(loaded_files: Vec<PathBuf>) -> Result<Self, ConfigError> {
        let api = ApiConfig::from_env();
        api.validate()?;
        Ok(Self {
            app: AppConfig::from_env(),
            api,
            loaded_files,
        })
    }
}
