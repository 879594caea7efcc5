//! Bearer token authentication for protected endpoints.
//!
//! [`JwtAuth`] rejects any request without a valid bearer token and injects
//! an [`AuthContext`] for the handlers behind it. [`RequireRoles`] narrows
//! an authenticated scope further to callers holding one of a set of roles.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    sync::Arc,
    task::{Context, Poll},
};

use tg_core::{
    domain::entities::token::Claims,
    services::authorization::{require_any_role, subject},
    services::token::{DecodeOptions, TokenService},
};

use crate::handlers::error::ApiError;

/// Caller identity injected into requests
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    /// The token's `sub` claim
    pub subject: String,
    /// Roles from the `roles` claim
    pub roles: Vec<String>,
    /// Every decoded claim
    pub claims: Claims,
}

impl AuthContext {
    /// Creates a context from accepted claims; a subject is required
    pub fn from_claims(claims: Claims) -> Result<Self, ApiError> {
        let subject = subject(&claims)?.to_string();
        let roles = claims.roles().into_iter().map(String::from).collect();
        Ok(Self { subject, roles, claims })
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|granted| granted == role)
    }
}

/// Extracts the token from `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively; an empty token counts as absent.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Decodes the bearer token of a request into an [`AuthContext`]
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
    options: &DecodeOptions,
) -> Result<AuthContext, ApiError> {
    let token = extract_bearer_token(headers).ok_or(ApiError::MissingCredentials)?;
    let claims = tokens.decode_token(token, options)?;
    AuthContext::from_claims(claims)
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    tokens: Arc<TokenService>,
    options: DecodeOptions,
}

impl JwtAuth {
    /// Validates with default options: expiry checked, 10 second leeway
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            options: DecodeOptions::default(),
        }
    }

    /// Validates with explicit options, e.g. a required audience
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service,
            tokens: Arc::clone(&self.tokens),
            options: self.options.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: S,
    tokens: Arc<TokenService>,
    options: DecodeOptions,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(req.headers(), &self.tokens, &self.options) {
            Ok(context) => {
                tracing::debug!(subject = %context.subject, path = %req.path(), "request authenticated");
                req.extensions_mut().insert(context);
                let response = self.service.call(req);
                Box::pin(async move { response.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(error) => {
                let response = req.into_response(error.error_response()).map_into_right_body();
                Box::pin(ready(Ok(response)))
            }
        }
    }
}

/// Role guard for routes already behind [`JwtAuth`]
///
/// Passes when the caller holds any of the listed roles. Requests without an
/// [`AuthContext`] get `401`, callers without a matching role `403`.
#[derive(Debug, Clone)]
pub struct RequireRoles {
    allowed: Arc<Vec<String>>,
}

impl RequireRoles {
    pub fn any<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            allowed: Arc::new(roles.into_iter().map(Into::into).collect()),
        }
    }

    /// Checks an authenticated caller against the allowed roles
    pub fn check(&self, context: &AuthContext) -> Result<(), ApiError> {
        require_any_role(&context.claims, self.allowed.as_slice())?;
        Ok(())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRoles
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRolesMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRolesMiddleware {
            service,
            guard: self.clone(),
        }))
    }
}

pub struct RequireRolesMiddleware<S> {
    service: S,
    guard: RequireRoles,
}

impl<S, B> Service<ServiceRequest> for RequireRolesMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let verdict = match req.extensions().get::<AuthContext>() {
            Some(context) => self.guard.check(context),
            None => Err(ApiError::MissingCredentials),
        };

        match verdict {
            Ok(()) => {
                let response = self.service.call(req);
                Box::pin(async move { response.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(error) => {
                let response = req.into_response(error.error_response()).map_into_right_body();
                Box::pin(ready(Ok(response)))
            }
        }
    }
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or(ApiError::MissingCredentials);

        ready(result)
    }
}

/// Extractor for optional authentication
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let auth = req.extensions().get::<AuthContext>().cloned();
        ready(Ok(OptionalAuth(auth)))
    }
}
