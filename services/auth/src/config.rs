use crate::domain::types::DEFAULT_CODE_TTL_MINUTES;

/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing JWT session tokens.
    pub jwt_secret: String,
    /// Admin bypass email. Empty disables the email bypass.
    pub admin_email: String,
    /// Admin bypass phone number (normalized, e.g. "+5521999999999").
    pub admin_phone: String,
    /// Password for the admin bypass identities.
    pub admin_password: String,
    /// Verification code time-to-live in minutes. Env var: `CODE_EXPIRY_MINUTES`.
    pub code_ttl_minutes: i64,
    /// Identity provider admin API base URL.
    pub identity_provider_url: String,
    /// Identity provider admin API key.
    pub identity_provider_key: String,
    /// SMS / email delivery provider base URL.
    pub delivery_provider_url: String,
    /// SMS / email delivery provider API key.
    pub delivery_provider_key: String,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    pub auth_port: u16,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            admin_email: std::env::var("ADMIN_EMAIL").unwrap_or_default(),
            admin_phone: std::env::var("ADMIN_PHONE_NUMBER").unwrap_or_default(),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_default(),
            code_ttl_minutes: std::env::var("CODE_EXPIRY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CODE_TTL_MINUTES),
            identity_provider_url: std::env::var("IDENTITY_PROVIDER_URL")
                .expect("IDENTITY_PROVIDER_URL"),
            identity_provider_key: std::env::var("IDENTITY_PROVIDER_KEY")
                .expect("IDENTITY_PROVIDER_KEY"),
            delivery_provider_url: std::env::var("DELIVERY_PROVIDER_URL")
                .expect("DELIVERY_PROVIDER_URL"),
            delivery_provider_key: std::env::var("DELIVERY_PROVIDER_KEY")
                .expect("DELIVERY_PROVIDER_KEY"),
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3112),
        }
    }
}
