//! Claims carried inside a signed token.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Subject claim
pub const CLAIM_SUBJECT: &str = "sub";

/// Issued-at claim (Unix seconds)
pub const CLAIM_ISSUED_AT: &str = "iat";

/// Expiry claim (Unix seconds)
pub const CLAIM_EXPIRES_AT: &str = "exp";

/// Not-before claim (Unix seconds)
pub const CLAIM_NOT_BEFORE: &str = "nbf";

/// Issuer claim
pub const CLAIM_ISSUER: &str = "iss";

/// Audience claim, a string or a list of strings
pub const CLAIM_AUDIENCE: &str = "aud";

/// Role names granted to the subject
pub const CLAIM_ROLES: &str = "roles";

/// A set of claims: string keys mapped to arbitrary JSON values
///
/// Serializes as a plain JSON object. The caller decides what goes in; by
/// convention a `sub` claim identifies the subject, but nothing here
/// requires it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Creates an empty claims set
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Creates a claims set carrying only a subject
    pub fn for_subject(subject: impl Into<String>) -> Self {
        Self::new().with(CLAIM_SUBJECT, subject.into())
    }

    /// Adds a claim, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a claim, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a claim
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The `sub` claim, when it is a string
    pub fn subject(&self) -> Option<&str> {
        self.get(CLAIM_SUBJECT).and_then(Value::as_str)
    }

    /// The `iat` claim, when it is an integer
    pub fn issued_at(&self) -> Option<i64> {
        self.get(CLAIM_ISSUED_AT).and_then(Value::as_i64)
    }

    /// The `exp` claim, when it is an integer
    pub fn expires_at(&self) -> Option<i64> {
        self.get(CLAIM_EXPIRES_AT).and_then(Value::as_i64)
    }

    /// The `iss` claim, when it is a string
    pub fn issuer(&self) -> Option<&str> {
        self.get(CLAIM_ISSUER).and_then(Value::as_str)
    }

    /// Audiences from `aud`, whether given as a string or a list
    pub fn audiences(&self) -> Vec<&str> {
        string_or_list(self.get(CLAIM_AUDIENCE))
    }

    /// Role names from the `roles` claim
    pub fn roles(&self) -> Vec<&str> {
        string_or_list(self.get(CLAIM_ROLES))
    }

    /// Whether every claim in `other` is present here with the same value
    pub fn contains_all(&self, other: &Claims) -> bool {
        other.iter().all(|(key, value)| self.get(key) == Some(value))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Claims {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn string_or_list(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::String(single)) => vec![single.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}
