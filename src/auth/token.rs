use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::identity::Identity;
use crate::models::Role;

/// Fixed lifetime of every issued token. There is no refresh: expiry forces a new login.
pub const TOKEN_LIFETIME_HOURS: i64 = 72;

/// The exact payload of an issued token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Why a token could not be issued or accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed")]
    Malformed,
    #[error("Expired")]
    Expired,
    #[error("InvalidSignature")]
    InvalidSignature,
    #[error("MissingClaim: {0}")]
    MissingClaim(&'static str),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies the signed, time-limited identity tokens.
///
/// The shared secret is handed in once at construction; nothing here reads the environment.
/// Any HMAC variant over that secret is accepted on verification, while issuance always
/// uses HS256.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Signs `{id, username, role, exp = now + 72h}`.
    pub fn issue(&self, user_id: Uuid, username: &str, role: Role) -> Result<String, TokenError> {
        let exp = (Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp();
        log::debug!("issuing token for user {} ({}), exp {}", username, role, exp);

        self.sign(&Claims {
            id: user_id,
            username: username.to_string(),
            role,
            exp,
        })
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies signature and expiry, then extracts the embedded identity.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| self.classify(token, e))?;

        identity_from_claims(&data.claims)
    }

    fn classify(&self, token: &str, error: JwtError) -> TokenError {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                // An expired token stays expired whatever its signature says.
                if self.expired_unverified(token) {
                    TokenError::Expired
                } else {
                    TokenError::InvalidSignature
                }
            }
            ErrorKind::MissingRequiredClaim(_) => TokenError::MissingClaim("exp"),
            _ => TokenError::Malformed,
        }
    }

    /// Checks only `exp`, ignoring the signature. Used to order failures, never to accept.
    fn expired_unverified(&self, token: &str) -> bool {
        let mut validation = self.validation.clone();
        validation.insecure_disable_signature_validation();

        matches!(
            decode::<Map<String, Value>>(token, &self.decoding_key, &validation),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature)
        )
    }
}

fn identity_from_claims(claims: &Map<String, Value>) -> Result<Identity, TokenError> {
    let id = claims
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or(TokenError::MissingClaim("id"))?;
    let username = claims
        .get("username")
        .and_then(Value::as_str)
        .ok_or(TokenError::MissingClaim("username"))?;
    let role = claims
        .get("role")
        .and_then(Value::as_str)
        .and_then(|role| role.parse::<Role>().ok())
        .ok_or(TokenError::MissingClaim("role"))?;

    Ok(Identity {
        id,
        username: username.to_string(),
        role,
    })
}
