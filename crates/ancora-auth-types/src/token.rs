//! JWT session-token validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// Default session lifetime: 1 day.
pub const ACCESS_TOKEN_EXP_SECS: u64 = 60 * 60 * 24;
/// Extended session lifetime when the user checked "remember me": 7 days.
pub const REMEMBER_ME_EXP_SECS: u64 = 60 * 60 * 24 * 7;

/// Identity extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub account_id: Uuid,
    pub role: i16,
    pub exp: u64,
    pub remember: bool,
}

/// Errors returned by the validation functions.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload shared by token issuance (auth service) and validation.
///
/// | Field | JWT claim | Rust type | Meaning |
/// |-------|-----------|-----------|---------|
/// | `sub` | `sub` | UUID string | account ID |
/// | `phone` | custom | optional string | phone the session was opened with |
/// | `role` | custom | `i16` wire value | see [`ancora_domain::user::UserRole`] |
/// | `exp` | `exp` | seconds since epoch | token expiration |
/// | `remember` | custom | bool | extended-lifetime session; refresh keeps the same horizon |
///
/// [`Deserialize`] is always available since all consumers validate tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_AUTH_SERVICE`** cargo feature.
/// Only the auth service enables it because it is the sole token issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct JwtClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: i16,
    pub exp: u64,
    #[serde(default)]
    pub remember: bool,
}

fn base_validation() -> Validation {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s to tolerate minor clock skew.
fn decode_jwt(token: &str, secret: &str, validation: &Validation) -> Result<JwtClaims, AuthError> {
    let data = decode::<JwtClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature
            | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
            | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => AuthError::InvalidSignature,
            _ => AuthError::Malformed,
        })?;

    Ok(data.claims)
}

/// Validate a bearer token value, returning parsed identity.
///
/// This is the primary public API for token validation.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret, &base_validation())?;
    let account_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        account_id,
        role: claims.role,
        exp: claims.exp,
        remember: claims.remember,
    })
}

// ── Feature-gated: auth service only ─────────────────────────────────────

/// Validate a token and return raw JWT claims.
///
/// Used by the refresh flow: validates the presented token, then looks up
/// the account from `sub` to issue a fresh one.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
pub fn validate_token(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    decode_jwt(token, secret, &base_validation())
}

/// Validate only the signature, ignoring expiration.
///
/// Used by the repair flow: an expired but authentically signed token is
/// enough to re-derive a session, subject to account liveness checks.
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
pub fn validate_signature_only(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = base_validation();
    validation.validate_exp = false;
    decode_jwt(token, secret, &validation)
}
