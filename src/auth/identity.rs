use serde::Serialize;
use uuid::Uuid;

use crate::models::Role;

/// The verified caller of a request: who they are and what role they hold.
///
/// Built exactly once per request from a verified token by `AuthMiddleware`, stored in the
/// request extensions under its own type, and read by handlers through the `FromRequest`
/// impl in `auth::extractors`. It is never rebuilt from the token or from request bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
