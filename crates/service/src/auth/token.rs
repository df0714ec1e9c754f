//! Bearer-token issuance and validation.
//!
//! Tokens are HS256-signed JWTs binding the account's id, username,
//! and role for a bounded lifetime (7 days by default). The signing
//! secret is process-wide configuration loaded once at startup and held
//! immutable afterwards; it is never logged and never serialized.

use accountd_core::types::DbId;
use accountd_db::models::AccountView;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token lifetime in days.
const DEFAULT_TOKEN_EXPIRY_DAYS: i64 = 7;

/// JWT claims embedded in every issued token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the account's internal database id.
    pub sub: DbId,
    /// The account's username at issuance time.
    pub username: String,
    /// The account's role name (e.g. `"admin"`, `"user"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for revocation / audit.
    pub jti: String,
}

/// Configuration for token issuance and validation.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in days (default: 7).
    pub token_expiry_days: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, token_expiry_days: i64) -> Self {
        Self {
            secret: secret.into(),
            token_expiry_days,
        }
    }

    /// Load token configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_TOKEN_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let token_expiry_days: i64 = std::env::var("JWT_TOKEN_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_TOKEN_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            token_expiry_days,
        }
    }
}

/// Error returned for any token that fails validation.
///
/// Expired tokens, signature mismatches, and malformed input all
/// collapse into this single condition so callers cannot distinguish
/// the reason.
#[derive(Debug, thiserror::Error)]
#[error("Invalid or expired token")]
pub struct InvalidToken;

/// Issue an HS256 token over a safe account view.
///
/// The claims bind id, username, and role; `exp` is `iat` plus the
/// configured lifetime.
pub fn issue_token(
    view: &AccountView,
    config: &TokenConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.token_expiry_days * 24 * 60 * 60;

    let claims = Claims {
        sub: view.id,
        username: view.username.clone(),
        role: view.role.as_str().to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate an inbound token and return the embedded [`Claims`].
///
/// Signature and expiration are checked; every failure maps to the
/// undifferentiated [`InvalidToken`].
pub fn verify_token(token: &str, config: &TokenConfig) -> Result<Claims, InvalidToken> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )
    .map(|data| data.claims)
    .map_err(|_| InvalidToken)
}
