use sea_orm::entity::prelude::*;

/// Portal account. `id` equals the external identity-provider id once the
/// account is bound; the primary key is what makes reconciliation idempotent.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub phone_number: Option<String>,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub tax_id: Option<String>,
    pub role: i16,
    pub position: Option<String>,
    pub department: Option<String>,
    pub active: bool,
    /// pending | active | unauthorized | inactive
    pub authorization_status: String,
    /// Argon2id PHC string. `None` until the user sets a password.
    pub password_hash: Option<String>,
    pub email_verified: bool,
    pub failed_login_attempts: i32,
    pub lock_until: Option<chrono::DateTime<chrono::Utc>>,
    /// Module permission map, see `ancora_domain::user::ModulePermissions`.
    pub modules: Json,
    /// Registration protocol number shown on the pending screen.
    pub protocol: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::verification_challenges::Entity")]
    VerificationChallenges,
    #[sea_orm(has_many = "super::access_events::Entity")]
    AccessEvents,
}

impl Related<super::verification_challenges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VerificationChallenges.def()
    }
}

impl Related<super::access_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccessEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
