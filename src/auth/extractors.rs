use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::identity::Identity;
use crate::error::AppError;

/// Hands the caller's [`Identity`] to handlers on routes protected by `AuthMiddleware`.
///
/// The identity is looked up by type in the request extensions. If it is absent the route
/// was registered outside the protected scope, and the request is refused with 401.
impl FromRequest for Identity {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Identity>().cloned() {
            Some(identity) => ready(Ok(identity)),
            None => {
                let err = AppError::Unauthorized("Unauthorized".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
