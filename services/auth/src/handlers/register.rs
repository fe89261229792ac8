use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::register::{QuickRegisterUseCase, RegisterInput};

// ── POST /auth/register ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub tax_id: String,
    pub password: String,
    pub invite_code: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = QuickRegisterUseCase {
        accounts: state.account_repo(),
        authorizations: state.authorization_repo(),
        challenges: state.challenge_repo(),
        delivery: state.code_delivery(),
        events: state.event_repo(),
        provider: state.identity_provider(),
        code_ttl_minutes: state.code_ttl_minutes,
    };

    let out = usecase
        .execute(RegisterInput {
            first_name: body.first_name,
            last_name: body.last_name,
            phone: body.phone,
            email: body.email,
            tax_id: body.tax_id,
            password: body.password,
            invite_code: body.invite_code,
            position: body.position,
            department: body.department,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(out)))
}
