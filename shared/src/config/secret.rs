//! Secret values that may be given inline or as a reference to be resolved

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::ConfigError;

/// A secret configuration value
///
/// Settings files may carry the secret itself or point at where it lives:
///
/// ```toml
/// secret_key = "inline-value"
/// secret_key = { env = "TG_SIGNING_SECRET" }
/// secret_key = { file = "/run/secrets/signing_key" }
/// ```
///
/// Only [`SecretValue::Plain`] can be used for signing. References must go
/// through [`SecretValue::resolve`] first.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SecretValue {
    /// The revealed secret
    Plain(String),
    /// Read from another environment variable
    Env { env: String },
    /// Read from a file, trailing newline stripped
    File { file: PathBuf },
}

impl SecretValue {
    /// Create a plain secret
    pub fn plain(value: impl Into<String>) -> Self {
        SecretValue::Plain(value.into())
    }

    /// Returns the raw secret, or `None` if this value is still a reference
    pub fn expose(&self) -> Option<&str> {
        match self {
            SecretValue::Plain(value) => Some(value.as_str()),
            SecretValue::Env { .. } | SecretValue::File { .. } => None,
        }
    }

    /// Whether the secret has been resolved to its raw form
    pub fn is_resolved(&self) -> bool {
        matches!(self, SecretValue::Plain(_))
    }

    /// Resolves a reference into a plain secret
    ///
    /// # Returns
    ///
    /// * `Ok(SecretValue::Plain)` - The revealed secret
    /// * `Err(ConfigError)` - The referenced variable or file could not be read
    pub fn resolve(&self) -> Result<SecretValue, ConfigError> {
        match self {
            SecretValue::Plain(_) => Ok(self.clone()),
            SecretValue::Env { env } => std::env::var(env)
                .map(SecretValue::Plain)
                .map_err(|e| ConfigError::Secret {
                    message: format!("environment variable {} unavailable: {}", env, e),
                }),
            SecretValue::File { file } => std::fs::read_to_string(file)
                .map(|contents| SecretValue::Plain(contents.trim_end_matches(['\r', '\n']).to_string()))
                .map_err(|e| ConfigError::Secret {
                    message: format!("failed to read {}: {}", file.display(), e),
                }),
        }
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretValue::Plain(_) => f.write_str("SecretValue::Plain(**********)"),
            SecretValue::Env { env } => f.debug_struct("SecretValue::Env").field("env", env).finish(),
            SecretValue::File { file } => f.debug_struct("SecretValue::File").field("file", file).finish(),
        }
    }
}

impl From<&str> for SecretValue {
    fn from(value: &str) -> Self {
        SecretValue::Plain(value.to_string())
    }
}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        SecretValue::Plain(value)
    }
}
