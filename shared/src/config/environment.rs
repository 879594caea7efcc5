//! Environment configuration module

use serde::{Deserialize, Serialize};
use std::env;

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer workstation
    Development,
    /// Local run outside of any deployment
    Local,
    /// Staging/test environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Whether a `.env` file should be read before loading settings
    pub fn loads_dotenv(&self) -> bool {
        matches!(self, Environment::Development | Environment::Local)
    }

    /// Get environment from the `ENVIRONMENT` variable, defaulting to development
    pub fn from_env() -> Self {
        Self::from_value(env::var("ENVIRONMENT").ok().as_deref())
    }

    /// Parse an optional environment name; unset or unknown names mean development
    pub fn from_value(value: Option<&str>) -> Self {
        value.and_then(|name| name.parse().ok()).unwrap_or_default()
    }

    /// Short name, as written in `ENVIRONMENT` and settings file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Local => "local",
            Environment::Staging => "staging",
            Environment::Production => "prod",
        }
    }

    /// Name of the environment specific settings file
    pub fn config_file(&self) -> String {
        format!("config/settings.{}", self.as_str())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "local" => Ok(Environment::Local),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Log format (json, pretty, compact)
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Include source location in logs
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("INFO"),
            format: default_log_format(),
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create a logging config, normalizing the level name
    pub fn new(level: &str, format: LogFormat) -> Self {
        Self {
            level: normalize_level(level),
            format,
            source_location: false,
        }
    }
}

/// Trim and upper-case a level name
pub fn normalize_level(level: &str) -> String {
    level.trim().to_uppercase()
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}
