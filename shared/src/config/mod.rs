//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token signing configuration
//! - `environment` - Environment detection and logging configuration
//! - `secret` - Inline or referenced secret values
//! - `server` - HTTP server configuration
//!
//! Settings are read from `config/settings.toml`, then the environment specific
//! file (`config/settings.<env>.toml`), then process environment variables.
//! In `dev` and `local` environments a `.env` file is loaded first.

pub mod auth;
pub mod environment;
pub mod secret;
pub mod server;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;

pub use auth::{JwtConfig, OneOrMany};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use secret::SecretValue;
pub use server::ServerConfig;

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Secret resolution failed: {message}")]
    Secret { message: String },

    #[error("Invalid setting {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Flat settings as they appear in files and environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default)]
    pub secret_key: Option<SecretValue>,

    #[serde(default = "default_algorithm", deserialize_with = "auth::deserialize_algorithms")]
    pub jwt_algorithm: OneOrMany<String>,

    #[serde(default = "default_token_expiry_minutes")]
    pub token_expiry_minutes: i64,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    #[serde(default = "default_server_host")]
    pub server_host: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// HTTP worker threads; 0 keeps the actix default of one per core
    #[serde(default)]
    pub server_workers: usize,
}

impl Settings {
    /// Load settings from files and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        if environment.loads_dotenv() {
            // A missing .env file is fine outside of local development too
            let _ = dotenvy::dotenv();
        }

        let builder = Config::builder()
            .add_source(File::with_name("config/settings").required(false))
            .add_source(File::with_name(&environment.config_file()).required(false))
            .add_source(config::Environment::default());

        Self::build(builder)
    }

    /// Load settings from TOML text only (no files, no environment)
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from_str(contents, FileFormat::Toml));
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    /// The token signing part of the settings
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret_key: self.secret_key.clone(),
            jwt_algorithm: self.jwt_algorithm.clone(),
            token_expiry_minutes: self.token_expiry_minutes,
            timezone: self.timezone.clone(),
        }
    }
}

/// Complete, validated application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Service name used in logs and health responses
    pub service_name: String,

    /// Token signing configuration with secrets resolved
    pub auth: JwtConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Server configuration
    pub server: ServerConfig,
}

impl AppConfig {
    /// Validate raw settings and resolve secret references
    ///
    /// A missing `secret_key` is not rejected here; the token service reports
    /// it on first use.
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        let environment = settings
            .environment
            .parse::<Environment>()
            .map_err(|message| ConfigError::Invalid {
                field: String::from("environment"),
                message,
            })?;

        if settings.token_expiry_minutes <= 0 {
            return Err(ConfigError::Invalid {
                field: String::from("token_expiry_minutes"),
                message: format!("must be positive, got {}", settings.token_expiry_minutes),
            });
        }

        let mut auth = settings.jwt_config();
        auth.resolve_secrets()?;

        Ok(Self {
            environment,
            service_name: settings.service_name,
            auth,
            logging: LoggingConfig::new(&settings.log_level, settings.log_format),
            server: ServerConfig::new(settings.server_host, settings.server_port)
                .with_workers(settings.server_workers),
        })
    }

    /// Load and validate configuration from all sources
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_settings(Settings::load()?)
    }
}

static SETTINGS: OnceCell<AppConfig> = OnceCell::new();

/// Process-wide settings, loaded once on first access
///
/// Concurrent first callers block until a single load completes. A failed
/// load is not cached.
pub fn get_settings() -> Result<&'static AppConfig, ConfigError> {
    SETTINGS.get_or_try_init(AppConfig::load)
}

fn default_environment() -> String {
    String::from(Environment::default().as_str())
}

fn default_service_name() -> String {
    String::from("token-gate")
}

fn default_algorithm() -> OneOrMany<String> {
    OneOrMany::One(String::from("HS256"))
}

fn default_token_expiry_minutes() -> i64 {
    60
}

fn default_timezone() -> String {
    String::from("Asia/Kolkata")
}

fn default_log_level() -> String {
    String::from("INFO")
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}

fn default_server_host() -> String {
    String::from("127.0.0.1")
}

fn default_server_port() -> u16 {
    8080
}
