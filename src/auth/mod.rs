pub mod access;
pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::User;

pub use access::{authorize, authorize_project, authorize_task, visible_tasks, Decision};
pub use identity::Identity;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenError, TokenService};

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn check_required(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::BadRequest(
                "Username and password are required".into(),
            ));
        }
        Ok(())
    }
}

/// Represents the payload for a new user registration request.
///
/// There is no role field: self-registered accounts are always plain users.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Must be between 3 and 32 characters, alphanumeric, and can include underscores or hyphens.
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    #[validate(email)]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
}

impl RegisterRequest {
    /// Empty required fields are a 400; malformed ones are left to `validate` (422).
    pub fn check_required(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            return Err(AppError::BadRequest(
                "Username, email, and password are required".into(),
            ));
        }
        Ok(())
    }
}

/// Returned after a successful login or registration: the token plus the account,
/// whose serialization never includes the password hash.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
