//! Bearer token authentication.
//!
//! The server consumes bearer credentials as a capability: verify the
//! token, yield the caller identity. Token issuance lives outside this
//! service; [`issue_token`] exists for the seed binary and the test
//! harness only.
//!
//! # Security
//! - The signing secret is wrapped in `SecretString` and never logged
//! - Tokens are HS256 with mandatory expiry

mod extractor;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use extractor::BearerAuth;

/// Claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    /// Username, for logging and display.
    pub username: String,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// The identity a verified bearer token yields.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

/// Verifies bearer tokens against the configured secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    pub fn new(secret: &SecretString) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        }
    }

    /// Verify a token and yield the caller identity.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, String> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| format!("Invalid bearer token: {}", e))?;

        Ok(AuthenticatedUser {
            id: data.claims.sub,
            username: data.claims.username,
        })
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenVerifier([REDACTED])")
    }
}

/// Mint a token for a user. Development/test tooling only.
pub fn issue_token(
    secret: &SecretString,
    user_id: Uuid,
    username: &str,
    valid_for_hours: i64,
) -> Result<String, String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (Utc::now() + Duration::hours(valid_for_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| format!("Failed to sign token: {}", e))
}
