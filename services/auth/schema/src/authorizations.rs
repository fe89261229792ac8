use sea_orm::entity::prelude::*;

/// Authorization gate entry: allow-list rows (email, phone or email domain),
/// invite codes, and auto-created pending access requests all live here,
/// distinguished by which identity column is set and by `status`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authorizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub email_domain: Option<String>,
    #[sea_orm(unique)]
    pub invite_code: Option<String>,
    /// active | pending | rejected | expired
    pub status: String,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Admin account that created the entry; `None` for auto-created requests.
    pub created_by: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
