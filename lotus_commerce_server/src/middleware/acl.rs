//! Access control middleware. Place it on any route or service nested inside the JWT middleware.
//!
//! It reads the [`PermissionSet`] the JWT middleware stored in the request extensions and checks
//! it against the permissions the route requires. All required codes must be present; otherwise
//! the request is answered with a 403 Forbidden.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorInternalServerError,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use lotus_commerce_engine::claims::PermissionSet;

use crate::errors::ServerError;

pub struct AclMiddlewareFactory {
    required_permissions: Vec<String>,
}

impl AclMiddlewareFactory {
    pub fn new(required_permissions: &[&str]) -> Self {
        AclMiddlewareFactory {
            required_permissions: required_permissions.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService {
            required_permissions: self.required_permissions.clone(),
            service: Rc::new(service),
        })
    }
}

pub struct AclMiddlewareService<S> {
    required_permissions: Vec<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required = self.required_permissions.clone();
        Box::pin(async move {
            let permissions = req.extensions().get::<PermissionSet>().cloned().ok_or_else(|| {
                log::warn!("No permission set found in request extensions");
                ErrorInternalServerError("No permission set found in request extensions")
            })?;
            if required.iter().all(|p| permissions.contains(p)) {
                service.call(req).await
            } else {
                Err(ServerError::InsufficientPermissions(required.join(", ")).into())
            }
        })
    }
}
