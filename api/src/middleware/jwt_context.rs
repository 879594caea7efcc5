//! Best-effort caller identification for every request.
//!
//! Unlike [`JwtAuth`](super::auth::JwtAuth) this never rejects: a valid
//! bearer token leaves an [`AuthContext`] in the request extensions (so
//! [`OptionalAuth`](super::auth::OptionalAuth) sees it) and is logged with
//! the request; anything else passes through untouched.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    sync::Arc,
    task::{Context, Poll},
};

use tg_core::services::token::{DecodeOptions, TokenService};

use super::auth::{authenticate, extract_bearer_token, AuthContext};
use crate::handlers::error::ApiError;

/// Non-enforcing JWT middleware factory
#[derive(Clone)]
pub struct JwtContext {
    tokens: Arc<TokenService>,
    options: DecodeOptions,
}

impl JwtContext {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            options: DecodeOptions::default(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtContext
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtContextMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtContextMiddleware {
            service,
            tokens: Arc::clone(&self.tokens),
            options: self.options.clone(),
        }))
    }
}

pub struct JwtContextMiddleware<S> {
    service: S,
    tokens: Arc<TokenService>,
    options: DecodeOptions,
}

impl<S, B> Service<ServiceRequest> for JwtContextMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if extract_bearer_token(req.headers()).is_some() {
            match authenticate(req.headers(), &self.tokens, &self.options) {
                Ok(context) => {
                    tracing::info!(
                        user = %context.subject,
                        method = %req.method(),
                        path = %req.path(),
                        "request from authenticated user"
                    );
                    req.extensions_mut().insert::<AuthContext>(context);
                }
                Err(ApiError::Domain(error)) if !error.is_authentication_failure() => {
                    tracing::warn!(error = %error, "could not identify caller");
                }
                Err(error) => {
                    tracing::debug!(error = %error, "ignoring unusable bearer token");
                }
            }
        }

        Box::pin(self.service.call(req))
    }
}
