//! Role and permission checks over accepted token claims
//!
//! These run after [`TokenService::decode_token`](super::token::TokenService::decode_token)
//! has accepted a token; they never look at signatures or expiry.

use std::collections::{HashMap, HashSet};

use crate::domain::entities::token::Claims;
use crate::errors::AuthError;

/// Returns the token subject
///
/// # Returns
///
/// * `Ok(&str)` - The `sub` claim
/// * `Err(AuthError::MissingSubject)` - `sub` absent, empty or not a string
pub fn subject(claims: &Claims) -> Result<&str, AuthError> {
    claims
        .subject()
        .filter(|sub| !sub.is_empty())
        .ok_or(AuthError::MissingSubject)
}

/// Requires the `roles` claim to share at least one entry with `allowed`
///
/// # Arguments
///
/// * `claims` - Claims of an accepted token
/// * `allowed` - Roles that grant access
///
/// # Returns
///
/// * `Ok(())` - At least one role matches
/// * `Err(AuthError::InsufficientRole)` - No role matches, or the claim is absent
pub fn require_any_role<S: AsRef<str>>(claims: &Claims, allowed: &[S]) -> Result<(), AuthError> {
    let granted = claims.roles();
    if allowed.iter().any(|role| granted.contains(&role.as_ref())) {
        Ok(())
    } else {
        Err(AuthError::InsufficientRole)
    }
}

/// Role to permission table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rbac {
    roles: HashMap<String, HashSet<String>>,
}

impl Default for Rbac {
    fn default() -> Self {
        Self::new()
            .grant("admin", ["user:read", "user:write"])
            .grant("user", ["user:read"])
    }
}

impl Rbac {
    /// Creates an empty table
    pub fn new() -> Self {
        Self { roles: HashMap::new() }
    }

    /// Adds permissions to a role, builder style
    pub fn grant<I, P>(mut self, role: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.roles
            .entry(role.into())
            .or_default()
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Whether `role` carries `permission`; unknown roles carry nothing
    pub fn check(&self, role: &str, permission: &str) -> bool {
        self.roles
            .get(role)
            .map_or(false, |permissions| permissions.contains(permission))
    }

    /// Requires any of the token's roles to carry `permission`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Permission granted
    /// * `Err(AuthError::PermissionDenied)` - No role carries it
    pub fn authorize(&self, claims: &Claims, permission: &str) -> Result<(), AuthError> {
        if claims.roles().iter().any(|role| self.check(role, permission)) {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied {
                permission: permission.to_string(),
            })
        }
    }

    /// Permissions held by a role, if the role is known
    pub fn permissions(&self, role: &str) -> Option<&HashSet<String>> {
        self.roles.get(role)
    }
}
