use std::path::{Path, PathBuf};

/// Deployment environment, from `APP_ENV`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Local,
    Development,
    Staging,
    Production,
    Testing,
    Custom(String),
}

impl Environment {
    /// Read `APP_ENV`; unset means `Local`
    pub fn detect() -> Self {
        match std::env::var("APP_ENV") {
            Ok(name) => Self::from_name(&name),
            Err(_) => Self::Local,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "" | "local" => Self::Local,
            "development" | "dev" => Self::Development,
            "staging" => Self::Staging,
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Testing => "testing",
            Self::Custom(name) => name.as_str(),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Local or development
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Local | Self::Development)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `.env` files for an environment, most specific first
///
/// 1. `.env.{environment}.local`
/// 2. `.env.{environment}`
/// 3. `.env.local`
/// 4. `.env`
pub fn dotenv_candidates(project_root: &Path, env: &Environment) -> Vec<PathBuf> {
    vec![
        project_root.join(format!(".env.{}.local", env)),
        project_root.join(format!(".env.{}", env)),
        project_root.join(".env.local"),
        project_root.join(".env"),
    ]
}

/// Load `.env` files with environment precedence
///
/// dotenvy never overwrites a variable that is already set, so files are
/// loaded most specific first and the real process environment always wins.
/// Returns the detected environment and the files that were actually read.
pub fn load_dotenv(project_root: &Path) -> (Environment, Vec<PathBuf>) {
    let env = Environment::detect();
    let loaded = dotenv_candidates(project_root, &env)
        .into_iter()
        .filter(|path| dotenvy::from_path(path).is_ok())
        .collect();
    (env, loaded)
}

/// Typed environment variable with a default for missing or unparsable values
///
/// # Example
/// ```
/// use produksi::config::env;
///
/// let timeout: u64 = env("API_TIMEOUT_SECS", 30);
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_optional(key).unwrap_or(default)
}

/// Typed environment variable, `None` when missing, blank or unparsable
pub fn env_optional<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
}

/// Boolean flag accepting `1/0`, `true/false`, `yes/no`, `on/off`
pub fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_name() {
        assert_eq!(Environment::from_name("Production"), Environment::Production);
        assert_eq!(Environment::from_name(""), Environment::Local);
        assert_eq!(Environment::from_name("qa"), Environment::Custom("qa".to_string()));
        assert!(Environment::from_name("dev").is_development());
    }

    #[test]
    fn test_dotenv_candidates_order() {
        let files = dotenv_candidates(Path::new("/app"), &Environment::Staging);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![".env.staging.local", ".env.staging", ".env.local", ".env"]
        );
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
