use crate::config::env::{env, env_flag, Environment};

/// Process-level settings
///
/// # Environment Variables
///
/// - `APP_ENV` - see [`Environment::detect`]
/// - `APP_NAME` - shown in CLI headers (default: `Produksi`)
/// - `APP_DEBUG` - verbose diagnostics (default: off)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub debug: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            name: env("APP_NAME", "Produksi".to_string()),
            environment: Environment::detect(),
            debug: env_flag("APP_DEBUG", false),
        }
    }

    /// Log filter to use when `RUST_LOG` is not set
    ///
    /// Library events show at `debug` with `APP_DEBUG`; everything else
    /// stays at `warn`.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "warn,produksi=debug"
        } else {
            "warn"
        }
    }
}
