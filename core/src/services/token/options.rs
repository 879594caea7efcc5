//! Per-call options for issuing and decoding tokens

/// Clock skew tolerated when checking `exp`, in seconds
pub const DEFAULT_LEEWAY_SECONDS: u64 = 10;

/// Options for [`TokenService::create_token`](super::TokenService::create_token)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueOptions {
    /// Overrides the configured lifetime; must be positive
    pub expires_in_minutes: Option<i64>,
    /// Sets the `iss` claim
    pub issuer: Option<String>,
    /// Sets the `aud` claim
    pub audience: Option<String>,
}

impl IssueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expires_in_minutes(mut self, minutes: i64) -> Self {
        self.expires_in_minutes = Some(minutes);
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }
}

/// Options for [`TokenService::decode_token`](super::TokenService::decode_token)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject tokens whose `exp` has passed beyond the leeway
    pub verify_exp: bool,
    /// Require `aud` to contain `expected_audience`
    pub verify_aud: bool,
    /// Require `iss` to be present and equal
    pub expected_issuer: Option<String>,
    /// Audience checked when `verify_aud` is set
    pub expected_audience: Option<String>,
    /// Clock skew tolerance for `exp`, in seconds
    pub leeway_seconds: u64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            verify_exp: true,
            verify_aud: false,
            expected_issuer: None,
            expected_audience: None,
            leeway_seconds: DEFAULT_LEEWAY_SECONDS,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept expired tokens
    pub fn skip_expiry(mut self) -> Self {
        self.verify_exp = false;
        self
    }

    /// Require the given audience
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.verify_aud = true;
        self.expected_audience = Some(audience.into());
        self
    }

    /// Require the given issuer
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}
