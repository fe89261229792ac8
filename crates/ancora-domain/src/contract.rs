//! Closed wire contract between the auth service and the login-flow client.
//!
//! Every status and outcome the server can emit is an enum variant here.
//! The client deserializes strictly; a payload that does not fit the
//! contract is treated as a failed request, never branched on by string.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{ModulePermissions, UserRole};

/// Non-success statuses the login gate can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    /// Account exists, awaiting approval or email verification.
    Pending,
    /// Identity denied by the authorization gate.
    Unauthorized,
    /// Account deactivated by an administrator.
    Inactive,
    /// Account approved but registration never finished.
    PendingRegistration,
    /// Account exists without a credential; registration must be completed.
    IncompleteRegistration,
    /// Authorized email with no account yet.
    NewEmail,
    /// Authorized phone with no account yet.
    NewPhone,
}

impl AuthStatus {
    /// Statuses that route the client to the quick-registration form.
    pub fn needs_registration(self) -> bool {
        matches!(
            self,
            Self::PendingRegistration
                | Self::IncompleteRegistration
                | Self::NewEmail
                | Self::NewPhone
        )
    }
}

/// Channel a verification code travels over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    Sms,
    Email,
}

impl DeliveryChannel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sms" => Some(Self::Sms),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Email => "email",
        }
    }
}

/// Result of `POST /auth/login` (step one of the flow).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InitiateOutcome {
    /// The account authenticates with a password; no code was sent.
    HasPassword,
    /// A verification code was delivered.
    CodeSent { channel: DeliveryChannel },
    /// The identity cannot proceed to a credential check.
    Blocked { status: AuthStatus },
}

/// Result of code verification, password login, refresh and repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionOutcome {
    Authenticated {
        token: String,
        /// The account has no password yet and must set one before the
        /// session is considered complete.
        requires_password: bool,
        profile: ProfileSnapshot,
    },
    Blocked {
        status: AuthStatus,
    },
}

/// Result of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegisterOutcome {
    /// Identity created (or reconciled); a verification code was sent.
    Registered { channel: DeliveryChannel },
    /// The identity already existed unverified; the code was re-sent.
    VerificationResent { channel: DeliveryChannel },
}

/// The slice of an account the client is allowed to hold between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub modules: ModulePermissions,
}
