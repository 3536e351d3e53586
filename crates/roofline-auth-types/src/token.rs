//! JWT issue and validation.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marketplace account token lifetime in seconds (7 days).
pub const ACCOUNT_TOKEN_TTL_SECS: u64 = 604_800;

/// Admin token lifetime in seconds (12 hours).
pub const ADMIN_TOKEN_TTL_SECS: u64 = 43_200;

/// Identity extracted from a validated token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub subject: Uuid,
    pub role: String,
    pub exp: u64,
}

/// A freshly signed token and its expiry (seconds since UNIX epoch).
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub exp: u64,
}

/// Errors returned by [`validate_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload shared by accounts and admins.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | account or admin id (UUID string) |
/// | `role` | custom | `user` / `owner` for accounts, `main_admin` / `employee` for admins |
/// | `exp` | `exp` | expiration, seconds since epoch |
///
/// Accounts and admins sign with different secrets, so a token of one kind never
/// validates as the other.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Sign an HS256 token for `subject` valid for `ttl_secs`.
pub fn issue_token(
    subject: Uuid,
    role: &str,
    ttl_secs: u64,
    secret: &str,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    let exp = now_secs() + ttl_secs;
    let claims = JwtClaims {
        sub: subject.to_string(),
        role: role.to_owned(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(IssuedToken { token, exp })
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims `exp` + `sub`, default 60s leeway.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a bearer token, returning the parsed identity.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    let subject = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        subject,
        role: claims.role,
        exp: claims.exp,
    })
}
