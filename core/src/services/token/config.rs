//! Configuration for the token service

use tg_shared::config::{JwtConfig, OneOrMany, SecretValue};

/// Configuration for the token service
///
/// Built from the shared [`JwtConfig`] once settings are loaded, or directly
/// in tests. Nothing is validated here; the service checks the values the
/// first time it needs them.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Shared signing secret, must be resolved to a plain value
    pub secret_key: Option<SecretValue>,
    /// Accepted algorithm identifier(s); the first one signs
    pub algorithms: OneOrMany<String>,
    /// Default token lifetime in minutes
    pub default_expiry_minutes: i64,
    /// IANA timezone used as the reference clock for `iat`/`exp`
    pub timezone: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(JwtConfig::default())
    }
}

impl TokenServiceConfig {
    /// Configuration with a plain secret and default everything else
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret_key: Some(SecretValue::plain(secret)),
            ..Default::default()
        }
    }

    /// Set the accepted algorithms, first one signs
    pub fn with_algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.algorithms = OneOrMany::Many(algorithms.into_iter().map(Into::into).collect());
        self
    }

    /// Set a single accepted algorithm
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithms = OneOrMany::One(algorithm.into());
        self
    }

    pub fn with_expiry_minutes(mut self, minutes: i64) -> Self {
        self.default_expiry_minutes = minutes;
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_secret(mut self, secret: Option<SecretValue>) -> Self {
        self.secret_key = secret;
        self
    }
}

impl From<JwtConfig> for TokenServiceConfig {
    fn from(config: JwtConfig) -> Self {
        Self {
            secret_key: config.secret_key,
            algorithms: config.jwt_algorithm,
            default_expiry_minutes: config.token_expiry_minutes,
            timezone: config.timezone,
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self::from(config.clone())
    }
}
