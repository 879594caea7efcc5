//! Main token service implementation

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::domain::entities::token::{
    Claims, CLAIM_AUDIENCE, CLAIM_EXPIRES_AT, CLAIM_ISSUED_AT, CLAIM_ISSUER, CLAIM_NOT_BEFORE,
};
use crate::errors::{DomainError, DomainResult, TokenError};

use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;
use super::key_material::{self, SigningMaterial};
use super::options::{DecodeOptions, IssueOptions};

/// Service for issuing and validating signed, time-bounded tokens
///
/// Stateless apart from the signing material, which is derived from the
/// configuration on first use and kept for the lifetime of the service.
/// Safe to share across threads behind an `Arc`.
pub struct TokenService {
    config: TokenServiceConfig,
    clock: Arc<dyn Clock>,
    algorithms: OnceCell<Vec<Algorithm>>,
    material: OnceCell<SigningMaterial>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("material", &self.material.get())
            .finish()
    }
}

impl TokenService {
    /// Creates a new token service using the wall clock
    ///
    /// Configuration is not checked here. Problems surface as
    /// `DomainError::Configuration` from the first call that needs the key.
    pub fn new(config: TokenServiceConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new token service with an explicit time source
    pub fn with_clock(config: TokenServiceConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            algorithms: OnceCell::new(),
            material: OnceCell::new(),
        }
    }

    /// Creates a service and resolves its signing material immediately
    ///
    /// # Returns
    ///
    /// * `Ok(TokenService)` - Ready to sign and verify
    /// * `Err(DomainError::Configuration)` - Key, algorithm or timezone unusable
    pub fn eager(config: TokenServiceConfig) -> DomainResult<Self> {
        let service = Self::new(config);
        service.material()?;
        Ok(service)
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Returns the raw shared secret
    ///
    /// # Returns
    ///
    /// * `Ok(&str)` - The revealed secret
    /// * `Err(DomainError::Configuration)` - Absent, empty, or not a plain string
    pub fn get_signing_key(&self) -> DomainResult<&str> {
        key_material::signing_key(self.config.secret_key.as_ref())
    }

    /// Returns the accepted algorithms, a configured scalar wrapped into a list
    ///
    /// # Returns
    ///
    /// * `Ok(&[Algorithm])` - One or more algorithms in configured order
    /// * `Err(DomainError::Configuration)` - Empty, unknown or asymmetric identifiers
    pub fn get_algorithms(&self) -> DomainResult<&[Algorithm]> {
        self.algorithms
            .get_or_try_init(|| key_material::parse_algorithms(&self.config.algorithms.to_vec()))
            .map(Vec::as_slice)
    }

    /// Keys, algorithms and timezone, computed once
    fn material(&self) -> DomainResult<&SigningMaterial> {
        self.material.get_or_try_init(|| {
            let secret = self.get_signing_key()?;
            let algorithms = self.get_algorithms()?.to_vec();
            let timezone = key_material::parse_timezone(&self.config.timezone)?;
            tracing::debug!(
                algorithms = ?algorithms,
                timezone = %timezone,
                "token signing material initialized"
            );
            Ok(SigningMaterial::new(secret, algorithms, timezone))
        })
    }

    /// Creates a signed token
    ///
    /// # Arguments
    ///
    /// * `claims` - Caller claims, conventionally including `sub`
    /// * `options` - Lifetime override, issuer and audience
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The compact token; `iat` and `exp` are integer Unix
    ///   seconds, `iss`/`aud` set when given
    /// * `Err(DomainError)` - Configuration unusable, non-positive lifetime, or signing failed
    pub fn create_token(&self, claims: &Claims, options: &IssueOptions) -> DomainResult<String> {
        let material = self.material()?;

        let minutes = match options.expires_in_minutes {
            Some(minutes) if minutes <= 0 => {
                return Err(TokenError::claims_invalid(format!(
                    "expiry must be a positive number of minutes, got {}",
                    minutes
                ))
                .into());
            }
            Some(minutes) => minutes,
            None if self.config.default_expiry_minutes <= 0 => {
                return Err(DomainError::configuration(format!(
                    "TOKEN_EXPIRY_MINUTES must be positive, got {}",
                    self.config.default_expiry_minutes
                )));
            }
            None => self.config.default_expiry_minutes,
        };

        let now = self.clock.now().with_timezone(&material.timezone());
        let expires_at = Duration::try_minutes(minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| TokenError::claims_invalid(format!("expiry of {} minutes is out of range", minutes)))?;

        let mut payload = claims.clone();
        payload.insert(CLAIM_ISSUED_AT, now.timestamp());
        payload.insert(CLAIM_EXPIRES_AT, expires_at.timestamp());
        if let Some(issuer) = options.issuer.as_deref() {
            payload.insert(CLAIM_ISSUER, issuer);
        }
        if let Some(audience) = options.audience.as_deref() {
            payload.insert(CLAIM_AUDIENCE, audience);
        }

        let header = Header::new(material.signing_algorithm());
        let token = encode(&header, &payload, material.encoding_key()).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            TokenError::SigningFailed
        })?;

        tracing::debug!(
            subject = ?payload.subject(),
            exp = expires_at.timestamp(),
            "issued token"
        );
        Ok(token)
    }

    /// Validates a token and returns its claims
    ///
    /// # Arguments
    ///
    /// * `token` - The compact token to validate
    /// * `options` - Which claims to check and the expiry leeway
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - All decoded claims, including `iat`, `exp`, `iss`, `aud`
    /// * `Err(TokenError::TokenExpired)` - `exp` passed beyond the leeway
    /// * `Err(TokenError::ClaimsInvalid)` - Issuer, audience or timestamps failed validation
    /// * `Err(TokenError::TokenInvalid)` - Signature, structure or algorithm rejected
    /// * `Err(DomainError::Configuration)` - Key or algorithm configuration unusable
    pub fn decode_token(&self, token: &str, options: &DecodeOptions) -> DomainResult<Claims> {
        let material = self.material()?;
        let validation = signature_validation(material.algorithms());

        let data = decode::<Claims>(token, material.decoding_key(), &validation).map_err(|e| {
            tracing::warn!(reason = ?e.kind(), "token rejected");
            DomainError::from(TokenError::TokenInvalid)
        })?;

        validate_claims(&data.claims, options, self.clock.now().timestamp()).map_err(|e| {
            tracing::warn!(error = %e, subject = ?data.claims.subject(), "token rejected");
            e
        })?;

        Ok(data.claims)
    }
}

/// Library validation limited to signature, algorithm and structure
///
/// Claim checks run in [`validate_claims`] against the service clock.
fn signature_validation(algorithms: &[Algorithm]) -> Validation {
    let mut validation = Validation::new(algorithms.first().copied().unwrap_or(Algorithm::HS256));
    validation.algorithms = algorithms.to_vec();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();
    validation
}

/// Applies the `iat` and `nbf` checks, then the requested `exp`, `aud` and
/// `iss` checks
fn validate_claims(claims: &Claims, options: &DecodeOptions, now: i64) -> Result<(), TokenError> {
    let leeway = i64::try_from(options.leeway_seconds).unwrap_or(i64::MAX);

    if let Some(iat) = claims.get(CLAIM_ISSUED_AT) {
        if iat.as_i64().is_none() {
            return Err(TokenError::claims_invalid("Issued At claim (iat) must be an integer"));
        }
    }

    if let Some(nbf) = claims.get(CLAIM_NOT_BEFORE) {
        let nbf = nbf
            .as_i64()
            .ok_or_else(|| TokenError::claims_invalid("Not Before claim (nbf) must be an integer"))?;
        if nbf.saturating_sub(now) > leeway {
            return Err(TokenError::claims_invalid("The token is not yet valid (nbf)"));
        }
    }

    if options.verify_exp {
        let exp = claims
            .get(CLAIM_EXPIRES_AT)
            .ok_or_else(|| TokenError::claims_invalid("Missing required claim: exp"))?
            .as_i64()
            .ok_or_else(|| TokenError::claims_invalid("Expiration Time claim (exp) must be an integer"))?;
        if now.saturating_sub(exp) > leeway {
            return Err(TokenError::TokenExpired);
        }
    }

    if options.verify_aud {
        let expected = options
            .expected_audience
            .as_deref()
            .ok_or_else(|| TokenError::claims_invalid("Invalid audience"))?;
        match claims.get(CLAIM_AUDIENCE) {
            None => return Err(TokenError::claims_invalid("Missing required claim: aud")),
            Some(Value::String(_)) | Some(Value::Array(_)) => {
                if !claims.audiences().contains(&expected) {
                    return Err(TokenError::claims_invalid("Invalid audience"));
                }
            }
            Some(_) => return Err(TokenError::claims_invalid("Invalid claim format in token")),
        }
    }

    if let Some(expected) = options.expected_issuer.as_deref() {
        match claims.issuer() {
            Some(issuer) if issuer == expected => {}
            Some(_) => return Err(TokenError::claims_invalid("Invalid issuer")),
            None => return Err(TokenError::claims_invalid("Missing required claim: iss")),
        }
    }

    Ok(())
}
