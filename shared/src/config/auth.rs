//! Authentication and token signing configuration

use serde::{Deserialize, Deserializer, Serialize};

use super::secret::SecretValue;

/// A configuration field that accepts either a single value or a list
///
/// Always read back as a list through [`OneOrMany::to_vec`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    /// Normalize to an ordered list, wrapping a single value
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value.clone()],
            OneOrMany::Many(values) => values.clone(),
        }
    }
}

impl OneOrMany<String> {
    /// Split a single comma separated value such as `HS512,HS256` into a list
    ///
    /// Environment variables can only carry one string, so this is how a list
    /// arrives from `JWT_ALGORITHM`.
    pub fn split_commas(self) -> Self {
        match self {
            OneOrMany::One(value) if value.contains(',') => OneOrMany::Many(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            other => other,
        }
    }
}

/// Deserialize an algorithm setting given as a string, a comma separated
/// string or a list
pub(crate) fn deserialize_algorithms<'de, D>(deserializer: D) -> Result<OneOrMany<String>, D::Error>
where
    D: Deserializer<'de>,
{
    OneOrMany::deserialize(deserializer).map(OneOrMany::split_commas)
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        OneOrMany::One(value)
    }
}

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    #[serde(default)]
    pub secret_key: Option<SecretValue>,

    /// Accepted signing algorithm(s); the first one signs new tokens
    #[serde(default = "default_algorithm", deserialize_with = "deserialize_algorithms")]
    pub jwt_algorithm: OneOrMany<String>,

    /// Default token lifetime in minutes
    #[serde(default = "default_token_expiry_minutes")]
    pub token_expiry_minutes: i64,

    /// IANA timezone used as the reference clock for `iat`/`exp`
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            jwt_algorithm: default_algorithm(),
            token_expiry_minutes: default_token_expiry_minutes(),
            timezone: default_timezone(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with a plain secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret_key: Some(SecretValue::plain(secret)),
            ..Default::default()
        }
    }

    /// Set the accepted algorithms
    pub fn with_algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.jwt_algorithm = OneOrMany::Many(algorithms.into_iter().map(Into::into).collect());
        self
    }

    /// Set the default token lifetime in minutes
    pub fn with_expiry_minutes(mut self, minutes: i64) -> Self {
        self.token_expiry_minutes = minutes;
        self
    }

    /// Set the reference timezone
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Configured algorithm identifiers, in order
    pub fn algorithms(&self) -> Vec<String> {
        self.jwt_algorithm.to_vec()
    }

    /// Replace secret references with their revealed values
    pub fn resolve_secrets(&mut self) -> Result<(), super::ConfigError> {
        if let Some(secret) = self.secret_key.as_ref() {
            self.secret_key = Some(secret.resolve()?);
        }
        Ok(())
    }
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
