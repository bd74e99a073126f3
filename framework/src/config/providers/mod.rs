mod api;
mod app;

pub use api::{ApiConfig, ApiConfigBuilder};
pub use app::AppConfig;
