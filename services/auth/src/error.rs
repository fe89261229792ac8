use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
///
/// Blocking login statuses (pending / unauthorized / inactive) are not
/// errors; they travel as `blocked` outcomes in 200 responses. This enum
/// covers the hard failures only.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("account not found")]
    AccountNotFound,
    #[error("invalid or expired code")]
    InvalidCode,
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account temporarily locked")]
    AccountLocked,
    #[error("admin role required")]
    Forbidden,
    #[error("identity not authorized to register")]
    NotAuthorized,
    #[error("an account with this email already exists")]
    RegistrationConflict,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    DeliveryFailed(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::InvalidCode => "INVALID_CODE",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::RegistrationConflict => "REGISTRATION_CONFLICT",
            Self::Validation(_) => "VALIDATION",
            Self::DeliveryFailed(_) => "DELIVERY_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::AccountNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCode | Self::InvalidToken | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::AccountLocked => StatusCode::LOCKED,
            Self::Forbidden | Self::NotAuthorized => StatusCode::FORBIDDEN,
            Self::RegistrationConflict => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DeliveryFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only; tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
