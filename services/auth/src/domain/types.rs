use ancora_domain::contract::{AuthStatus, DeliveryChannel, ProfileSnapshot};
use ancora_domain::user::{AccountStatus, ModulePermissions, UserRole};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Verification code length (digits).
pub const CODE_LEN: usize = 6;

/// Default verification code time-to-live in minutes (configurable).
pub const DEFAULT_CODE_TTL_MINUTES: i64 = 15;

/// Failed password attempts before the account locks.
pub const MAX_FAILED_LOGINS: i32 = 5;

/// Lockout duration in minutes.
pub const LOCKOUT_MINUTES: i64 = 15;

/// Invite code length (uppercase alphanumeric).
pub const INVITE_CODE_LEN: usize = 8;

/// Portal account as the usecases see it.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub tax_id: Option<String>,
    pub role: UserRole,
    pub position: Option<String>,
    pub department: Option<String>,
    pub active: bool,
    pub status: AccountStatus,
    pub password_hash: Option<String>,
    pub email_verified: bool,
    pub failed_login_attempts: i32,
    pub lock_until: Option<DateTime<Utc>>,
    pub modules: ModulePermissions,
    pub protocol: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.is_some_and(|until| until > now)
    }

    /// The status to report when this account cannot proceed to a
    /// credential check; `None` means the account may log in.
    ///
    /// A pending account reports `pending` even when it is also deactivated;
    /// approval is the step the user is actually waiting on. Within pending,
    /// a missing password means registration never finished, so the account
    /// is routed back to quick-registration instead of a dead-end screen:
    /// unverified means the emailed challenge was never answered
    /// (`pending_registration`), verified-but-credentialless means the form
    /// was abandoned after verification (`incomplete_registration`).
    pub fn blocking_status(&self) -> Option<AuthStatus> {
        match self.status {
            AccountStatus::Unauthorized => return Some(AuthStatus::Unauthorized),
            AccountStatus::Pending => {
                return Some(match (&self.password_hash, self.email_verified) {
                    (None, false) => AuthStatus::PendingRegistration,
                    (None, true) => AuthStatus::IncompleteRegistration,
                    (Some(_), _) => AuthStatus::Pending,
                });
            }
            AccountStatus::Active | AccountStatus::Inactive => {}
        }
        if !self.active || self.status == AccountStatus::Inactive {
            return Some(AuthStatus::Inactive);
        }
        None
    }

    pub fn profile(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            role: self.role,
            modules: self.modules,
        }
    }
}

/// Active verification code for one account and channel.
#[derive(Debug, Clone)]
pub struct VerificationChallenge {
    pub id: Uuid,
    pub account_id: Uuid,
    pub channel: DeliveryChannel,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VerificationChallenge {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// What kind of gate entry an [`AuthorizationEntry`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    Active,
    Pending,
    Rejected,
    Expired,
}

impl AuthorizationStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "rejected" => Some(Self::Rejected),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

/// One row of the authorization gate: an allow-list entry, an invite code,
/// or a pending access request.
#[derive(Debug, Clone)]
pub struct AuthorizationEntry {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub email_domain: Option<String>,
    pub invite_code: Option<String>,
    pub status: AuthorizationStatus,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthorizationEntry {
    /// An invite is usable while active, unexpired, and under its use cap.
    pub fn invite_usable(&self, now: DateTime<Utc>) -> bool {
        self.status == AuthorizationStatus::Active
            && self.expires_at.is_none_or(|at| at > now)
            && self
                .max_uses
                .is_none_or(|max| self.used_count < max)
    }
}

/// Audit actions recorded in `access_events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessAction {
    Created,
    Registered,
    Login,
    AccountLocked,
    Reconciled,
}

impl AccessAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Registered => "REGISTERED",
            Self::Login => "LOGIN",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::Reconciled => "RECONCILED",
        }
    }
}
