#![allow(async_fn_in_trait)]

use ancora_domain::contract::DeliveryChannel;
use ancora_domain::pagination::PageRequest;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{AccessAction, Account, AuthorizationEntry, VerificationChallenge};
use crate::error::AuthServiceError;

/// Repository for portal accounts.
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthServiceError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, AuthServiceError>;
    /// Combined lookup: matches the value against either identity column.
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, AuthServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthServiceError>;

    async fn create(&self, account: &Account) -> Result<(), AuthServiceError>;

    /// Insert-or-update keyed by `account.id`. Running reconciliation twice
    /// for the same external identity converges on one row.
    async fn upsert(&self, account: &Account) -> Result<(), AuthServiceError>;

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), AuthServiceError>;

    /// Record a wrong password: bump the counter and optionally set a lock.
    async fn record_login_failure(
        &self,
        id: Uuid,
        attempts: i32,
        lock_until: Option<DateTime<Utc>>,
    ) -> Result<(), AuthServiceError>;

    async fn clear_login_failures(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Mark the account's email verified and activate it.
    async fn mark_verified(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Repository for verification challenges.
pub trait ChallengeRepository: Send + Sync {
    /// Write the active challenge for (account, channel), replacing any
    /// previous one. The superseded code can never verify again.
    async fn put(&self, challenge: &VerificationChallenge) -> Result<(), AuthServiceError>;

    async fn find_active(
        &self,
        account_id: Uuid,
        channel: DeliveryChannel,
    ) -> Result<Option<VerificationChallenge>, AuthServiceError>;

    /// Delete a consumed challenge.
    async fn consume(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Repository for the authorization gate.
pub trait AuthorizationRepository: Send + Sync {
    /// Active allow-list entry matching this email or its domain.
    async fn find_active_for_email(
        &self,
        email: &str,
    ) -> Result<Option<AuthorizationEntry>, AuthServiceError>;

    async fn find_active_for_phone(
        &self,
        phone: &str,
    ) -> Result<Option<AuthorizationEntry>, AuthServiceError>;

    async fn find_invite(&self, code: &str)
        -> Result<Option<AuthorizationEntry>, AuthServiceError>;

    /// Bump an invite's use counter.
    async fn consume_invite(&self, id: Uuid) -> Result<(), AuthServiceError>;

    /// Pending access request already filed for this identifier, if any.
    async fn find_pending_request(
        &self,
        identifier: &str,
    ) -> Result<Option<AuthorizationEntry>, AuthServiceError>;

    async fn create(&self, entry: &AuthorizationEntry) -> Result<(), AuthServiceError>;

    async fn list_pending(
        &self,
        page: PageRequest,
    ) -> Result<Vec<AuthorizationEntry>, AuthServiceError>;
}

/// Append-only audit log.
pub trait AccessEventRepository: Send + Sync {
    async fn record(
        &self,
        account_id: Option<Uuid>,
        action: AccessAction,
        detail: Option<&str>,
    ) -> Result<(), AuthServiceError>;
}

/// Identity known to the external provider.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub id: Uuid,
    pub email: String,
    pub email_verified: bool,
}

/// Result of asking the provider to create an identity.
#[derive(Debug, Clone)]
pub enum CreateIdentityOutcome {
    Created(ProviderIdentity),
    /// The provider already holds this email; reconciliation decides what
    /// that means locally.
    EmailExists,
}

/// Port to the external identity provider.
pub trait IdentityProviderPort: Send + Sync {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreateIdentityOutcome, AuthServiceError>;

    /// One page of the provider's identity listing, for finding orphaned
    /// identities. An empty page means the listing is exhausted.
    async fn list_identities(
        &self,
        page: PageRequest,
    ) -> Result<Vec<ProviderIdentity>, AuthServiceError>;
}

/// Port to the SMS / email delivery providers.
///
/// Failures surface verbatim as [`AuthServiceError::DeliveryFailed`];
/// there is no retry and no cross-channel fallback.
pub trait CodeDeliveryPort: Send + Sync {
    async fn send_code(
        &self,
        channel: DeliveryChannel,
        recipient: &str,
        code: &str,
    ) -> Result<(), AuthServiceError>;
}
