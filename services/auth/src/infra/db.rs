use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use ancora_auth_schema::{access_events, accounts, authorizations, verification_challenges};
use ancora_domain::contract::DeliveryChannel;
use ancora_domain::pagination::PageRequest;
use ancora_domain::user::{AccountStatus, UserRole};

use crate::domain::repository::{
    AccessEventRepository, AccountRepository, AuthorizationRepository, ChallengeRepository,
};
use crate::domain::types::{
    AccessAction, Account, AuthorizationEntry, AuthorizationStatus, VerificationChallenge,
};
use crate::error::AuthServiceError;

// ── Account repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthServiceError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find account by email")?;
        model.map(account_from_model).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, AuthServiceError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::PhoneNumber.eq(phone))
            .one(&self.db)
            .await
            .context("find account by phone")?;
        model.map(account_from_model).transpose()
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, AuthServiceError> {
        let model = accounts::Entity::find()
            .filter(
                Condition::any()
                    .add(accounts::Column::Email.eq(identifier))
                    .add(accounts::Column::PhoneNumber.eq(identifier)),
            )
            .one(&self.db)
            .await
            .context("find account by identifier")?;
        model.map(account_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthServiceError> {
        let model = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find account by id")?;
        model.map(account_from_model).transpose()
    }

    async fn create(&self, account: &Account) -> Result<(), AuthServiceError> {
        account_to_active_model(account)
            .insert(&self.db)
            .await
            .context("create account")?;
        Ok(())
    }

    async fn upsert(&self, account: &Account) -> Result<(), AuthServiceError> {
        accounts::Entity::insert(account_to_active_model(account))
            .on_conflict(
                OnConflict::column(accounts::Column::Id)
                    .update_columns([
                        accounts::Column::PhoneNumber,
                        accounts::Column::Email,
                        accounts::Column::FirstName,
                        accounts::Column::LastName,
                        accounts::Column::TaxId,
                        accounts::Column::Role,
                        accounts::Column::Position,
                        accounts::Column::Department,
                        accounts::Column::Active,
                        accounts::Column::AuthorizationStatus,
                        accounts::Column::PasswordHash,
                        accounts::Column::EmailVerified,
                        accounts::Column::Modules,
                        accounts::Column::Protocol,
                        accounts::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .context("upsert account")?;
        Ok(())
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), AuthServiceError> {
        accounts::ActiveModel {
            id: Set(id),
            password_hash: Set(Some(hash.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set password hash")?;
        Ok(())
    }

    async fn record_login_failure(
        &self,
        id: Uuid,
        attempts: i32,
        lock_until: Option<chrono::DateTime<Utc>>,
    ) -> Result<(), AuthServiceError> {
        accounts::ActiveModel {
            id: Set(id),
            failed_login_attempts: Set(attempts),
            lock_until: Set(lock_until),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record login failure")?;
        Ok(())
    }

    async fn clear_login_failures(&self, id: Uuid) -> Result<(), AuthServiceError> {
        accounts::ActiveModel {
            id: Set(id),
            failed_login_attempts: Set(0),
            lock_until: Set(None),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("clear login failures")?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), AuthServiceError> {
        accounts::ActiveModel {
            id: Set(id),
            email_verified: Set(true),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark account verified")?;

        // Verification completes registration only for pending accounts;
        // an admin-deactivated account stays where the admin put it.
        accounts::Entity::update_many()
            .col_expr(
                accounts::Column::AuthorizationStatus,
                sea_orm::sea_query::Expr::value(AccountStatus::Active.as_str()),
            )
            .filter(accounts::Column::Id.eq(id))
            .filter(accounts::Column::AuthorizationStatus.eq(AccountStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("activate verified account")?;
        Ok(())
    }
}

fn account_to_active_model(account: &Account) -> accounts::ActiveModel {
    accounts::ActiveModel {
        id: Set(account.id),
        phone_number: Set(account.phone_number.clone()),
        email: Set(account.email.clone()),
        first_name: Set(account.first_name.clone()),
        last_name: Set(account.last_name.clone()),
        tax_id: Set(account.tax_id.clone()),
        role: Set(account.role.as_i16()),
        position: Set(account.position.clone()),
        department: Set(account.department.clone()),
        active: Set(account.active),
        authorization_status: Set(account.status.as_str().to_owned()),
        password_hash: Set(account.password_hash.clone()),
        email_verified: Set(account.email_verified),
        failed_login_attempts: Set(account.failed_login_attempts),
        lock_until: Set(account.lock_until),
        modules: Set(serde_json::to_value(account.modules).unwrap_or_default()),
        protocol: Set(account.protocol.clone()),
        created_at: Set(account.created_at),
        updated_at: Set(account.updated_at),
    }
}

fn account_from_model(model: accounts::Model) -> Result<Account, AuthServiceError> {
    let role = UserRole::from_i16(model.role)
        .ok_or_else(|| anyhow::anyhow!("account {} has unknown role {}", model.id, model.role))?;
    let status = AccountStatus::from_str(&model.authorization_status).ok_or_else(|| {
        anyhow::anyhow!(
            "account {} has unknown status {:?}",
            model.id,
            model.authorization_status
        )
    })?;
    let modules = serde_json::from_value(model.modules)
        .with_context(|| format!("account {} has malformed modules", model.id))?;

    Ok(Account {
        id: model.id,
        phone_number: model.phone_number,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        tax_id: model.tax_id,
        role,
        position: model.position,
        department: model.department,
        active: model.active,
        status,
        password_hash: model.password_hash,
        email_verified: model.email_verified,
        failed_login_attempts: model.failed_login_attempts,
        lock_until: model.lock_until,
        modules,
        protocol: model.protocol,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Challenge repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbChallengeRepository {
    pub db: DatabaseConnection,
}

impl ChallengeRepository for DbChallengeRepository {
    async fn put(&self, challenge: &VerificationChallenge) -> Result<(), AuthServiceError> {
        // Unique on (account_id, channel): a resend replaces the previous
        // code in the same statement that writes the new one.
        verification_challenges::Entity::insert(verification_challenges::ActiveModel {
            id: Set(challenge.id),
            account_id: Set(challenge.account_id),
            channel: Set(challenge.channel.as_str().to_owned()),
            code: Set(challenge.code.clone()),
            expires_at: Set(challenge.expires_at),
            created_at: Set(challenge.created_at),
        })
        .on_conflict(
            OnConflict::columns([
                verification_challenges::Column::AccountId,
                verification_challenges::Column::Channel,
            ])
            .update_columns([
                verification_challenges::Column::Id,
                verification_challenges::Column::Code,
                verification_challenges::Column::ExpiresAt,
                verification_challenges::Column::CreatedAt,
            ])
            .to_owned(),
        )
        .exec(&self.db)
        .await
        .context("put verification challenge")?;
        Ok(())
    }

    async fn find_active(
        &self,
        account_id: Uuid,
        channel: DeliveryChannel,
    ) -> Result<Option<VerificationChallenge>, AuthServiceError> {
        let model = verification_challenges::Entity::find()
            .filter(verification_challenges::Column::AccountId.eq(account_id))
            .filter(verification_challenges::Column::Channel.eq(channel.as_str()))
            .one(&self.db)
            .await
            .context("find active challenge")?;
        model.map(challenge_from_model).transpose()
    }

    async fn consume(&self, id: Uuid) -> Result<(), AuthServiceError> {
        verification_challenges::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("consume challenge")?;
        Ok(())
    }
}

fn challenge_from_model(
    model: verification_challenges::Model,
) -> Result<VerificationChallenge, AuthServiceError> {
    let channel = DeliveryChannel::from_str(&model.channel).ok_or_else(|| {
        anyhow::anyhow!(
            "challenge {} has unknown channel {:?}",
            model.id,
            model.channel
        )
    })?;
    Ok(VerificationChallenge {
        id: model.id,
        account_id: model.account_id,
        channel,
        code: model.code,
        expires_at: model.expires_at,
        created_at: model.created_at,
    })
}

// ── Authorization repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAuthorizationRepository {
    pub db: DatabaseConnection,
}

impl AuthorizationRepository for DbAuthorizationRepository {
    async fn find_active_for_email(
        &self,
        email: &str,
    ) -> Result<Option<AuthorizationEntry>, AuthServiceError> {
        let mut matcher = Condition::any().add(authorizations::Column::Email.eq(email));
        if let Some((_, domain)) = email.split_once('@') {
            matcher = matcher.add(authorizations::Column::EmailDomain.eq(domain));
        }
        let model = authorizations::Entity::find()
            .filter(authorizations::Column::Status.eq(AuthorizationStatus::Active.as_str()))
            .filter(matcher)
            .one(&self.db)
            .await
            .context("find authorization by email")?;
        model.map(entry_from_model).transpose()
    }

    async fn find_active_for_phone(
        &self,
        phone: &str,
    ) -> Result<Option<AuthorizationEntry>, AuthServiceError> {
        let model = authorizations::Entity::find()
            .filter(authorizations::Column::Status.eq(AuthorizationStatus::Active.as_str()))
            .filter(authorizations::Column::PhoneNumber.eq(phone))
            .one(&self.db)
            .await
            .context("find authorization by phone")?;
        model.map(entry_from_model).transpose()
    }

    async fn find_invite(
        &self,
        code: &str,
    ) -> Result<Option<AuthorizationEntry>, AuthServiceError> {
        let model = authorizations::Entity::find()
            .filter(authorizations::Column::InviteCode.eq(code))
            .one(&self.db)
            .await
            .context("find invite")?;
        model.map(entry_from_model).transpose()
    }

    async fn consume_invite(&self, id: Uuid) -> Result<(), AuthServiceError> {
        authorizations::Entity::update_many()
            .col_expr(
                authorizations::Column::UsedCount,
                sea_orm::sea_query::Expr::col(authorizations::Column::UsedCount).add(1),
            )
            .filter(authorizations::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("consume invite")?;
        Ok(())
    }

    async fn find_pending_request(
        &self,
        identifier: &str,
    ) -> Result<Option<AuthorizationEntry>, AuthServiceError> {
        let model = authorizations::Entity::find()
            .filter(authorizations::Column::Status.eq(AuthorizationStatus::Pending.as_str()))
            .filter(
                Condition::any()
                    .add(authorizations::Column::Email.eq(identifier))
                    .add(authorizations::Column::PhoneNumber.eq(identifier)),
            )
            .one(&self.db)
            .await
            .context("find pending access request")?;
        model.map(entry_from_model).transpose()
    }

    async fn create(&self, entry: &AuthorizationEntry) -> Result<(), AuthServiceError> {
        authorizations::ActiveModel {
            id: Set(entry.id),
            email: Set(entry.email.clone()),
            phone_number: Set(entry.phone_number.clone()),
            email_domain: Set(entry.email_domain.clone()),
            invite_code: Set(entry.invite_code.clone()),
            status: Set(entry.status.as_str().to_owned()),
            max_uses: Set(entry.max_uses),
            used_count: Set(entry.used_count),
            expires_at: Set(entry.expires_at),
            created_by: Set(entry.created_by),
            note: Set(entry.note.clone()),
            created_at: Set(entry.created_at),
            updated_at: Set(entry.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create authorization entry")?;
        Ok(())
    }

    async fn list_pending(
        &self,
        page: PageRequest,
    ) -> Result<Vec<AuthorizationEntry>, AuthServiceError> {
        let page = page.clamped();
        let models = authorizations::Entity::find()
            .filter(authorizations::Column::Status.eq(AuthorizationStatus::Pending.as_str()))
            .order_by_asc(authorizations::Column::CreatedAt)
            .paginate(&self.db, u64::from(page.per_page))
            .fetch_page(u64::from(page.page - 1))
            .await
            .context("list pending access requests")?;
        models.into_iter().map(entry_from_model).collect()
    }
}

fn entry_from_model(model: authorizations::Model) -> Result<AuthorizationEntry, AuthServiceError> {
    let status = AuthorizationStatus::from_str(&model.status).ok_or_else(|| {
        anyhow::anyhow!(
            "authorization {} has unknown status {:?}",
            model.id,
            model.status
        )
    })?;
    Ok(AuthorizationEntry {
        id: model.id,
        email: model.email,
        phone_number: model.phone_number,
        email_domain: model.email_domain,
        invite_code: model.invite_code,
        status,
        max_uses: model.max_uses,
        used_count: model.used_count,
        expires_at: model.expires_at,
        created_by: model.created_by,
        note: model.note,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Access event repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccessEventRepository {
    pub db: DatabaseConnection,
}

impl AccessEventRepository for DbAccessEventRepository {
    async fn record(
        &self,
        account_id: Option<Uuid>,
        action: AccessAction,
        detail: Option<&str>,
    ) -> Result<(), AuthServiceError> {
        access_events::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(account_id),
            action: Set(action.as_str().to_owned()),
            detail: Set(detail.map(str::to_owned)),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .context("record access event")?;
        Ok(())
    }
}
