use actix_web::HttpResponse;
use serde::Serialize;
use tg_core::domain::entities::token::Claims;

use crate::middleware::auth::AuthContext;

/// Body returned by the introspection endpoint
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: String,
    pub roles: Vec<String>,
    pub claims: Claims,
}

/// Handler for GET /api/v1/auth/me
///
/// Echoes the caller's accepted claims. Requires authentication via Bearer
/// token in the Authorization header.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "subject": "alice",
///     "roles": ["admin"],
///     "claims": { "sub": "alice", "roles": ["admin"], "iat": 1700000000, "exp": 1700003600 }
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing, expired or invalid token
/// - 400 Bad Request: Token has no subject
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        subject: auth.subject,
        roles: auth.roles,
        claims: auth.claims,
    })
}
