use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use ancora_auth_types::bearer::BearerToken;
use ancora_domain::contract::ProfileSnapshot;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::token::{CheckSessionUseCase, RefreshTokenUseCase, RepairTokenUseCase};

// ── POST /auth/token/refresh ──────────────────────────────────────────────────

pub async fn refresh_token(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = RefreshTokenUseCase {
        accounts: state.account_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase.execute(&token).await?;
    Ok(Json(out))
}

// ── POST /auth/token/repair ───────────────────────────────────────────────────

pub async fn repair_token(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = RepairTokenUseCase {
        accounts: state.account_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase.execute(&token).await?;
    Ok(Json(out))
}

// ── GET /auth/session ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub profile: ProfileSnapshot,
    pub exp: u64,
    pub remember: bool,
}

pub async fn check_session(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = CheckSessionUseCase {
        accounts: state.account_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let info = usecase.execute(&token).await?;
    Ok(Json(SessionResponse {
        profile: info.profile,
        exp: info.exp,
        remember: info.remember,
    }))
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

/// Sessions are stateless JWTs; logout is the client purging its store. The
/// endpoint exists so clients have a single place to report session end.
pub async fn logout(
    State(_state): State<AppState>,
    _token: BearerToken,
) -> Result<impl IntoResponse, AuthServiceError> {
    Ok(StatusCode::NO_CONTENT)
}
