use std::time::{SystemTime, UNIX_EPOCH};

use ancora_auth_types::token::{
    ACCESS_TOKEN_EXP_SECS, JwtClaims, REMEMBER_ME_EXP_SECS, validate_signature_only,
    validate_token,
};
use ancora_domain::contract::{ProfileSnapshot, SessionOutcome};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use crate::domain::repository::AccountRepository;
use crate::domain::types::Account;
use crate::error::AuthServiceError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Issue a session token. `remember` picks the 7-day horizon and is carried
/// in the claims so refresh keeps the same horizon.
pub fn issue_session_token(
    account: &Account,
    remember: bool,
    secret: &str,
) -> Result<(String, u64), AuthServiceError> {
    let lifetime = if remember {
        REMEMBER_ME_EXP_SECS
    } else {
        ACCESS_TOKEN_EXP_SECS
    };
    let exp = now_secs() + lifetime;
    let claims = JwtClaims {
        sub: account.id.to_string(),
        phone: account.phone_number.clone(),
        role: account.role.as_i16(),
        exp,
        remember,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

/// Shared liveness re-check for refresh and repair: the account must still
/// exist and must not have become blocked since the token was issued.
async fn reissue_for_claims<A: AccountRepository>(
    accounts: &A,
    claims: JwtClaims,
    secret: &str,
) -> Result<SessionOutcome, AuthServiceError> {
    let account_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthServiceError::InvalidToken)?;

    let account = accounts
        .find_by_id(account_id)
        .await?
        .ok_or(AuthServiceError::InvalidToken)?;

    if let Some(status) = account.blocking_status() {
        return Ok(SessionOutcome::Blocked { status });
    }

    let (token, _exp) = issue_session_token(&account, claims.remember, secret)?;
    Ok(SessionOutcome::Authenticated {
        token,
        requires_password: account.password_hash.is_none(),
        profile: account.profile(),
    })
}

// ── Refresh ──────────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase<A: AccountRepository> {
    pub accounts: A,
    pub jwt_secret: String,
}

impl<A: AccountRepository> RefreshTokenUseCase<A> {
    /// Full validation: signature and expiry must both hold.
    pub async fn execute(&self, token_value: &str) -> Result<SessionOutcome, AuthServiceError> {
        let claims = validate_token(token_value, &self.jwt_secret)
            .map_err(|_| AuthServiceError::InvalidToken)?;
        reissue_for_claims(&self.accounts, claims, &self.jwt_secret).await
    }
}

// ── Repair ───────────────────────────────────────────────────────────────────

pub struct RepairTokenUseCase<A: AccountRepository> {
    pub accounts: A,
    pub jwt_secret: String,
}

impl<A: AccountRepository> RepairTokenUseCase<A> {
    /// Signature-only validation: an expired but authentic token still
    /// re-derives a session, subject to the same liveness checks.
    pub async fn execute(&self, token_value: &str) -> Result<SessionOutcome, AuthServiceError> {
        let claims = validate_signature_only(token_value, &self.jwt_secret)
            .map_err(|_| AuthServiceError::InvalidToken)?;
        reissue_for_claims(&self.accounts, claims, &self.jwt_secret).await
    }
}

// ── Session echo ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SessionInfo {
    pub profile: ProfileSnapshot,
    pub exp: u64,
    pub remember: bool,
}

pub struct CheckSessionUseCase<A: AccountRepository> {
    pub accounts: A,
    pub jwt_secret: String,
}

impl<A: AccountRepository> CheckSessionUseCase<A> {
    pub async fn execute(&self, token_value: &str) -> Result<SessionInfo, AuthServiceError> {
        let claims = validate_token(token_value, &self.jwt_secret)
            .map_err(|_| AuthServiceError::InvalidToken)?;
        let account_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthServiceError::InvalidToken)?;
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        Ok(SessionInfo {
            profile: account.profile(),
            exp: claims.exp,
            remember: claims.remember,
        })
    }
}
