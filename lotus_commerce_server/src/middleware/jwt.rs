//! JWT middleware for Actix Web.
//!
//! Validates the `Authorization: Bearer` access token on incoming requests, expands the
//! compressed permission claims, and stores both the [`JwtClaims`] and the resulting
//! [`PermissionSet`] in the request extensions for downstream handlers and the ACL middleware.
//!
//! Expansion fails closed: a permission claim that doesn't decode contributes nothing, so the
//! worst a corrupted token can do is carry fewer permissions than it was issued with.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use lcp_common::Secret;
use log::{trace, warn};

use crate::{
    auth::validate_token,
    errors::{AuthError, ServerError},
};

pub struct JwtMiddlewareFactory {
    secret: Secret<String>,
}

impl JwtMiddlewareFactory {
    pub fn new(secret: Secret<String>) -> Self {
        JwtMiddlewareFactory { secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = JwtMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtMiddlewareService { secret: self.secret.clone(), service: Rc::new(service) }))
    }
}

pub struct JwtMiddlewareService<S> {
    secret: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.secret.clone();
        Box::pin(async move {
            trace!("🔐️ Checking access token for request");
            let token = req
                .headers()
                .get(actix_web::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::trim);
            let token = match token {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => {
                    warn!("🔐️ No access token found in request. Denying access.");
                    return Err(ServerError::from(AuthError::MissingToken).into());
                },
            };
            match validate_token(&token, &secret) {
                Ok(claims) => {
                    let permissions = claims.permission_set();
                    trace!("🔐️ {} authenticated with {} permissions", claims.name, permissions.len());
                    req.extensions_mut().insert(claims);
                    req.extensions_mut().insert(permissions);
                    service.call(req).await
                },
                Err(e) => {
                    warn!("🔐️ Invalid access token in request. Denying access. {e}");
                    Err(ServerError::from(e).into())
                },
            }
        })
    }
}
