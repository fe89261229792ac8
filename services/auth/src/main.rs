use sea_orm::Database;
use tracing::info;

use ancora_auth::config::AuthConfig;
use ancora_auth::router::build_router;
use ancora_auth::state::AppState;
use ancora_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let http = reqwest::Client::new();

    let state = AppState {
        db,
        http,
        jwt_secret: config.jwt_secret,
        admin_email: config.admin_email,
        admin_phone: config.admin_phone,
        admin_password: config.admin_password,
        code_ttl_minutes: config.code_ttl_minutes,
        identity_provider_url: config.identity_provider_url,
        identity_provider_key: config.identity_provider_key,
        delivery_provider_url: config.delivery_provider_url,
        delivery_provider_key: config.delivery_provider_key,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
