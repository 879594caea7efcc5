//! Signing key and algorithm resolution

use chrono_tz::Tz;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use std::str::FromStr;

use crate::errors::{DomainError, DomainResult};
use tg_shared::config::SecretValue;

/// Returns the raw shared secret
///
/// HMAC signing needs the revealed string. A secret that is absent, empty,
/// or still a reference (`{ env = .. }` / `{ file = .. }`) is rejected.
///
/// # Returns
///
/// * `Ok(&str)` - The raw secret
/// * `Err(DomainError::Configuration)` - Secret unusable for signing
pub fn signing_key(secret: Option<&SecretValue>) -> DomainResult<&str> {
    let secret = secret.ok_or_else(|| DomainError::configuration("SECRET_KEY is missing or invalid"))?;

    match secret.expose() {
        Some(raw) if !raw.is_empty() => Ok(raw),
        Some(_) => Err(DomainError::configuration("SECRET_KEY is missing or invalid")),
        None => Err(DomainError::configuration(
            "SECRET_KEY is not a plain string; resolve the secret reference before use",
        )),
    }
}

/// Parses configured identifiers into an ordered algorithm list
///
/// Only the HMAC family is accepted since tokens are signed with a shared
/// secret.
///
/// # Returns
///
/// * `Ok(Vec<Algorithm>)` - One or more algorithms, order preserved
/// * `Err(DomainError::Configuration)` - Empty list, unknown or asymmetric identifier
pub fn parse_algorithms(identifiers: &[String]) -> DomainResult<Vec<Algorithm>> {
    if identifiers.is_empty() {
        return Err(DomainError::configuration("JWT_ALGORITHM must name at least one algorithm"));
    }

    identifiers
        .iter()
        .map(|identifier| {
            let identifier = identifier.trim();
            let algorithm = Algorithm::from_str(identifier).map_err(|_| {
                DomainError::configuration(format!("unknown JWT algorithm: {}", identifier))
            })?;
            match algorithm {
                Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
                _ => Err(DomainError::configuration(format!(
                    "JWT algorithm {} needs an asymmetric key; only HS256, HS384 and HS512 are supported",
                    identifier
                ))),
            }
        })
        .collect()
}

/// Parses the reference timezone
pub fn parse_timezone(name: &str) -> DomainResult<Tz> {
    name.parse::<Tz>()
        .map_err(|e| DomainError::configuration(format!("unknown timezone {}: {}", name, e)))
}

/// Everything needed to sign and verify, derived once from configuration
#[derive(Clone)]
pub struct SigningMaterial {
    algorithms: Vec<Algorithm>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    timezone: Tz,
}

impl std::fmt::Debug for SigningMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningMaterial")
            .field("algorithms", &self.algorithms)
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl SigningMaterial {
    /// Builds keys from a raw secret
    pub fn new(secret: &str, algorithms: Vec<Algorithm>, timezone: Tz) -> Self {
        Self {
            algorithms,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            timezone,
        }
    }

    /// The algorithm new tokens are signed with
    pub fn signing_algorithm(&self) -> Algorithm {
        // parse_algorithms never yields an empty list
        self.algorithms.first().copied().unwrap_or(Algorithm::HS256)
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_plain() {
        let secret = SecretValue::plain("shh");
        assert_eq!(signing_key(Some(&secret)).unwrap(), "shh");
    }

    #[test]
    fn test_signing_key_missing() {
        assert!(matches!(signing_key(None), Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_signing_key_empty() {
        let secret = SecretValue::plain("");
        assert!(matches!(signing_key(Some(&secret)), Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_signing_key_unresolved_reference() {
        let secret = SecretValue::Env { env: "TG_SIGNING".to_string() };
        let err = signing_key(Some(&secret)).unwrap_err();
        assert!(err.to_string().contains("not a plain string"));
    }

    #[test]
    fn test_parse_algorithms_preserves_order() {
        let parsed = parse_algorithms(&["HS512".to_string(), " HS256 ".to_string()]).unwrap();
        assert_eq!(parsed, vec![Algorithm::HS512, Algorithm::HS256]);
    }

    #[test]
    fn test_parse_algorithms_rejects_asymmetric_and_unknown() {
        assert!(parse_algorithms(&["RS256".to_string()]).is_err());
        assert!(parse_algorithms(&["HS999".to_string()]).is_err());
        assert!(parse_algorithms(&[]).is_err());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Asia/Kolkata").unwrap(), Tz::Asia__Kolkata);
        assert!(parse_timezone("Mars/Olympus").is_err());
    }
}
