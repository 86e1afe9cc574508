use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::identity::Identity;
use crate::auth::token::TokenService;
use crate::error::AppError;

/// Rejects requests without a valid bearer token and attaches the caller's [`Identity`]
/// to the request extensions for everything downstream.
///
/// Wrap it around the protected scope only; public endpoints are registered outside it.
/// Rejections are rendered directly as 401 responses rather than propagated as errors.
#[derive(Clone)]
pub struct AuthMiddleware {
    tokens: TokenService,
}

impl AuthMiddleware {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: TokenService,
}

impl<S> AuthMiddlewareService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<Identity, AppError> {
        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Authorization header is required".into()))?;

        let token = bearer_token(header_value.to_str().ok()).ok_or_else(|| {
            AppError::Unauthorized("Authorization header format must be Bearer {token}".into())
        })?;

        self.tokens.verify(token).map_err(|e| {
            log::debug!("rejected token on {} {}: {}", req.method(), req.path(), e);
            AppError::from(e)
        })
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authenticate(&req) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                let response = req
                    .into_response(app_err.error_response())
                    .map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

/// Extracts `<token>` from `Bearer <token>`; anything else is rejected.
fn bearer_token(value: Option<&str>) -> Option<&str> {
    value?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
