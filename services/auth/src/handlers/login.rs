use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use ancora_auth_types::bearer::BearerToken;
use ancora_auth_types::token::validate_access_token;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::initiate::{InitiateLoginInput, InitiateLoginUseCase};
use crate::usecase::password::{
    PasswordLoginInput, PasswordLoginUseCase, SetPasswordInput, SetPasswordUseCase,
};
use crate::usecase::verify::{VerifyCodeInput, VerifyCodeUseCase};

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct InitiateRequest {
    pub identifier: String,
    pub invite_code: Option<String>,
}

pub async fn initiate_login(
    State(state): State<AppState>,
    Json(body): Json<InitiateRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = InitiateLoginUseCase {
        accounts: state.account_repo(),
        authorizations: state.authorization_repo(),
        challenges: state.challenge_repo(),
        delivery: state.code_delivery(),
        events: state.event_repo(),
        admin_email: state.admin_email.clone(),
        admin_phone: state.admin_phone.clone(),
        code_ttl_minutes: state.code_ttl_minutes,
    };

    let out = usecase
        .execute(InitiateLoginInput {
            identifier: body.identifier,
            invite_code: body.invite_code,
        })
        .await?;

    Ok(Json(out))
}

// ── POST /auth/verify ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub identifier: String,
    pub code: String,
    #[serde(default)]
    pub remember: bool,
}

pub async fn verify_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyCodeUseCase {
        accounts: state.account_repo(),
        authorizations: state.authorization_repo(),
        challenges: state.challenge_repo(),
        events: state.event_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase
        .execute(VerifyCodeInput {
            identifier: body.identifier,
            code: body.code,
            remember: body.remember,
        })
        .await?;

    Ok(Json(out))
}

// ── POST /auth/password ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PasswordLoginRequest {
    pub identifier: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

pub async fn password_login(
    State(state): State<AppState>,
    Json(body): Json<PasswordLoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = PasswordLoginUseCase {
        accounts: state.account_repo(),
        events: state.event_repo(),
        jwt_secret: state.jwt_secret.clone(),
        admin_email: state.admin_email.clone(),
        admin_phone: state.admin_phone.clone(),
        admin_password: state.admin_password.clone(),
    };

    let out = usecase
        .execute(PasswordLoginInput {
            identifier: body.identifier,
            password: body.password,
            remember: body.remember,
        })
        .await?;

    Ok(Json(out))
}

// ── POST /auth/password/set ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
}

pub async fn set_password(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(body): Json<SetPasswordRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let info = validate_access_token(&token, &state.jwt_secret)
        .map_err(|_| AuthServiceError::InvalidToken)?;

    let usecase = SetPasswordUseCase {
        accounts: state.account_repo(),
    };

    usecase
        .execute(SetPasswordInput {
            account_id: info.account_id,
            password: body.password,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
