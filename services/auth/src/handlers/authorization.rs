use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ancora_auth_types::bearer::BearerToken;
use ancora_auth_types::token::{TokenInfo, validate_access_token};
use ancora_domain::pagination::PageRequest;
use ancora_domain::user::UserRole;

use crate::domain::types::AuthorizationEntry;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::authorization::{
    CreateAllowlistEntryUseCase, CreateAllowlistInput, ListPendingRequestsUseCase, MintInviteInput,
    MintInviteUseCase,
};

fn require_admin(token: &str, secret: &str) -> Result<TokenInfo, AuthServiceError> {
    let info =
        validate_access_token(token, secret).map_err(|_| AuthServiceError::InvalidToken)?;
    if info.role < UserRole::Admin.as_i16() {
        return Err(AuthServiceError::Forbidden);
    }
    Ok(info)
}

#[derive(Serialize)]
pub struct AuthorizationResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub email_domain: Option<String>,
    pub invite_code: Option<String>,
    pub status: &'static str,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    #[serde(serialize_with = "ancora_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<AuthorizationEntry> for AuthorizationResponse {
    fn from(entry: AuthorizationEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email,
            phone_number: entry.phone_number,
            email_domain: entry.email_domain,
            invite_code: entry.invite_code,
            status: entry.status.as_str(),
            max_uses: entry.max_uses,
            used_count: entry.used_count,
            expires_at: entry.expires_at,
            note: entry.note,
            created_at: entry.created_at,
        }
    }
}

// ── POST /auth/authorizations ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateAllowlistRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub email_domain: Option<String>,
    pub note: Option<String>,
}

pub async fn create_allowlist_entry(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(body): Json<CreateAllowlistRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let admin = require_admin(&token, &state.jwt_secret)?;

    let usecase = CreateAllowlistEntryUseCase {
        authorizations: state.authorization_repo(),
    };

    let entry = usecase
        .execute(CreateAllowlistInput {
            email: body.email,
            phone: body.phone,
            email_domain: body.email_domain,
            note: body.note,
            created_by: admin.account_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AuthorizationResponse::from(entry))))
}

// ── POST /auth/invites ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MintInviteRequest {
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

pub async fn mint_invite(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(body): Json<MintInviteRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let admin = require_admin(&token, &state.jwt_secret)?;

    let usecase = MintInviteUseCase {
        authorizations: state.authorization_repo(),
    };

    let entry = usecase
        .execute(MintInviteInput {
            max_uses: body.max_uses,
            expires_at: body.expires_at,
            note: body.note,
            created_by: admin.account_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AuthorizationResponse::from(entry))))
}

// ── GET /auth/access-requests ─────────────────────────────────────────────────

pub async fn list_access_requests(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    require_admin(&token, &state.jwt_secret)?;

    let usecase = ListPendingRequestsUseCase {
        authorizations: state.authorization_repo(),
    };

    let entries = usecase.execute(page).await?;
    let body: Vec<AuthorizationResponse> =
        entries.into_iter().map(AuthorizationResponse::from).collect();
    Ok(Json(body))
}
