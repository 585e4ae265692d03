//! # Access Gateway
//!
//! Bearer tokens and password hashes.
//!
//! ```text
//! login ──► verify_password(hash, plain) ──► issue_token(user) ──► client
//!                                                                    │
//! request ◄── user id ◄── authenticate(token) ◄── Authorization: Bearer
//! ```
//!
//! Tokens are stateless HS256 JWTs; logout is a client-side affair.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockroom_core::{DbId, User};

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Malformed, forged, expired or foreign token.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Failed to hash password: {0}")]
    Hashing(String),
}

/// Token and password operations the HTTP layer depends on.
pub trait Authenticator: Send + Sync {
    /// Returns the user id a valid token was issued to.
    fn authenticate(&self, token: &str) -> Result<DbId, AuthError>;

    fn issue_token(&self, user: &User) -> Result<String, AuthError>;

    /// `false` for a wrong password and for a hash that cannot be parsed.
    fn verify_password(&self, hash: &str, plain: &str) -> bool;

    /// Argon2id PHC string with a random salt.
    fn hash_password(&self, plain: &str) -> Result<String, AuthError>;

    /// Runs a full password verification that always fails, for logins
    /// naming an account that does not exist.
    fn verify_decoy(&self, plain: &str);
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    pub username: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// HS256 tokens and Argon2id hashes.
pub struct JwtAuthenticator {
    secret: String,
    issuer: String,
    lifetime: Duration,
    /// Hash checked on unknown-account logins, made on first use.
    decoy_hash: OnceLock<String>,
}

impl JwtAuthenticator {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>, lifetime_hours: i64) -> Self {
        JwtAuthenticator {
            secret: secret.into(),
            issuer: issuer.into(),
            lifetime: Duration::hours(lifetime_hours),
            decoy_hash: OnceLock::new(),
        }
    }

    /// Validates and decodes a token.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, token: &str) -> Result<DbId, AuthError> {
        let claims = self.decode_claims(token)?;
        claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken(format!("bad subject '{}'", claims.sub)))
    }

    fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + self.lifetime;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn verify_password(&self, hash: &str, plain: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn hash_password(&self, plain: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn verify_decoy(&self, plain: &str) {
        let hash = self.decoy_hash.get_or_init(|| {
            let decoy = Uuid::new_v4().to_string();
            self.hash_password(&decoy).unwrap_or_else(|err| {
                tracing::error!(error = %err, "Failed to prepare decoy hash");
                String::new()
            })
        });
        let _ = self.verify_password(hash, plain);
    }
}

/// Extracts the token from an `Authorization` header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
