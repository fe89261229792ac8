use ancora_domain::contract::SessionOutcome;
use ancora_domain::identifier::Identifier;
use ancora_domain::user::{AccountStatus, ModulePermissions, UserRole};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, password_hash::rand_core::OsRng};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::repository::{AccessEventRepository, AccountRepository};
use crate::domain::types::{AccessAction, Account, LOCKOUT_MINUTES, MAX_FAILED_LOGINS};
use crate::error::AuthServiceError;
use crate::usecase::token::issue_session_token;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthServiceError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("parse password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// ── Password login ────────────────────────────────────────────────────────────

pub struct PasswordLoginInput {
    pub identifier: String,
    pub password: String,
    pub remember: bool,
}

pub struct PasswordLoginUseCase<A, E>
where
    A: AccountRepository,
    E: AccessEventRepository,
{
    pub accounts: A,
    pub events: E,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_phone: String,
    pub admin_password: String,
}

impl<A, E> PasswordLoginUseCase<A, E>
where
    A: AccountRepository,
    E: AccessEventRepository,
{
    pub async fn execute(
        &self,
        input: PasswordLoginInput,
    ) -> Result<SessionOutcome, AuthServiceError> {
        let identifier = Identifier::parse(&input.identifier).ok_or_else(|| {
            AuthServiceError::Validation("enter a valid phone number or email".into())
        })?;

        let account = match &identifier {
            Identifier::Email(email) => self.accounts.find_by_email(email).await?,
            Identifier::Phone(phone) => self.accounts.find_by_phone(phone).await?,
        };
        let account = match account {
            Some(account) => account,
            // First login of a configured admin identity materializes its row
            None if self.is_admin_identifier(&identifier) => {
                if self.admin_password.is_empty() || input.password != self.admin_password {
                    return Err(AuthServiceError::InvalidCredentials);
                }
                self.bootstrap_admin().await?
            }
            None => return Err(AuthServiceError::InvalidCredentials),
        };

        let now = Utc::now();
        if account.is_locked(now) {
            return Err(AuthServiceError::AccountLocked);
        }

        let Some(hash) = &account.password_hash else {
            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(&input.password, hash)? {
            return self.register_failure(&account, now).await;
        }

        if account.failed_login_attempts > 0 || account.lock_until.is_some() {
            self.accounts.clear_login_failures(account.id).await?;
        }

        if let Some(status) = account.blocking_status() {
            return Ok(SessionOutcome::Blocked { status });
        }

        self.events
            .record(Some(account.id), AccessAction::Login, Some("password"))
            .await?;
        let (token, _exp) = issue_session_token(&account, input.remember, &self.jwt_secret)?;

        Ok(SessionOutcome::Authenticated {
            token,
            requires_password: false,
            profile: account.profile(),
        })
    }

    fn is_admin_identifier(&self, identifier: &Identifier) -> bool {
        match identifier {
            Identifier::Email(email) => {
                !self.admin_email.is_empty() && email.eq_ignore_ascii_case(&self.admin_email)
            }
            Identifier::Phone(phone) => {
                !self.admin_phone.is_empty() && phone == &self.admin_phone
            }
        }
    }

    async fn bootstrap_admin(&self) -> Result<Account, AuthServiceError> {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            phone_number: (!self.admin_phone.is_empty()).then(|| self.admin_phone.clone()),
            email: (!self.admin_email.is_empty()).then(|| self.admin_email.clone()),
            first_name: "Admin".into(),
            last_name: String::new(),
            tax_id: None,
            role: UserRole::Admin,
            position: None,
            department: None,
            active: true,
            status: AccountStatus::Active,
            password_hash: Some(hash_password(&self.admin_password)?),
            email_verified: true,
            failed_login_attempts: 0,
            lock_until: None,
            modules: ModulePermissions::for_role(UserRole::Admin),
            protocol: None,
            created_at: now,
            updated_at: now,
        };
        self.accounts.create(&account).await?;
        self.events
            .record(Some(account.id), AccessAction::Created, Some("admin bootstrap"))
            .await?;
        Ok(account)
    }

    async fn register_failure(
        &self,
        account: &Account,
        now: chrono::DateTime<Utc>,
    ) -> Result<SessionOutcome, AuthServiceError> {
        let attempts = account.failed_login_attempts + 1;
        let lock_until =
            (attempts >= MAX_FAILED_LOGINS).then(|| now + Duration::minutes(LOCKOUT_MINUTES));
        self.accounts
            .record_login_failure(account.id, attempts, lock_until)
            .await?;

        if lock_until.is_some() {
            self.events
                .record(
                    Some(account.id),
                    AccessAction::AccountLocked,
                    Some("too many failed password attempts"),
                )
                .await?;
            return Err(AuthServiceError::AccountLocked);
        }
        Err(AuthServiceError::InvalidCredentials)
    }
}

// ── Set password (forced after a code login) ──────────────────────────────────

pub struct SetPasswordInput {
    pub account_id: Uuid,
    pub password: String,
}

pub struct SetPasswordUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> SetPasswordUseCase<A> {
    pub async fn execute(&self, input: SetPasswordInput) -> Result<(), AuthServiceError> {
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthServiceError::Validation(format!(
                "password must have at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let account = self
            .accounts
            .find_by_id(input.account_id)
            .await?
            .ok_or(AuthServiceError::AccountNotFound)?;

        let hash = hash_password(&input.password)?;
        self.accounts.set_password_hash(account.id, &hash).await?;
        Ok(())
    }
}
