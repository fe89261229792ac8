use reqwest::Client;
use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAccessEventRepository, DbAccountRepository, DbAuthorizationRepository,
    DbChallengeRepository,
};
use crate::infra::delivery::HttpCodeDelivery;
use crate::infra::provider::HttpIdentityProvider;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub http: Client,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_phone: String,
    pub admin_password: String,
    pub code_ttl_minutes: i64,
    pub identity_provider_url: String,
    pub identity_provider_key: String,
    pub delivery_provider_url: String,
    pub delivery_provider_key: String,
}

impl AppState {
    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn challenge_repo(&self) -> DbChallengeRepository {
        DbChallengeRepository {
            db: self.db.clone(),
        }
    }

    pub fn authorization_repo(&self) -> DbAuthorizationRepository {
        DbAuthorizationRepository {
            db: self.db.clone(),
        }
    }

    pub fn event_repo(&self) -> DbAccessEventRepository {
        DbAccessEventRepository {
            db: self.db.clone(),
        }
    }

    pub fn identity_provider(&self) -> HttpIdentityProvider {
        HttpIdentityProvider {
            http: self.http.clone(),
            base_url: self.identity_provider_url.clone(),
            api_key: self.identity_provider_key.clone(),
        }
    }

    pub fn code_delivery(&self) -> HttpCodeDelivery {
        HttpCodeDelivery {
            http: self.http.clone(),
            base_url: self.delivery_provider_url.clone(),
            api_key: self.delivery_provider_key.clone(),
        }
    }
}
