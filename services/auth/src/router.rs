use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use ancora_core::health::{healthz, readyz};
use ancora_core::middleware::request_id_layer;

use crate::handlers::{
    authorization::{create_allowlist_entry, list_access_requests, mint_invite},
    login::{initiate_login, password_login, set_password, verify_code},
    register::register,
    token::{check_session, logout, refresh_token, repair_token},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Login flow
        .route("/auth/login", post(initiate_login))
        .route("/auth/verify", post(verify_code))
        .route("/auth/password", post(password_login))
        .route("/auth/password/set", post(set_password))
        // Registration
        .route("/auth/register", post(register))
        // Session
        .route("/auth/token/refresh", post(refresh_token))
        .route("/auth/token/repair", post(repair_token))
        .route("/auth/session", get(check_session))
        .route("/auth/logout", post(logout))
        // Admin authorization gate
        .route("/auth/authorizations", post(create_allowlist_entry))
        .route("/auth/invites", post(mint_invite))
        .route("/auth/access-requests", get(list_access_requests))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
