//! Account roles, statuses and module permissions.

use serde::{Deserialize, Serialize};

/// Account permission level.
///
/// Wire format: `i16` in the database, snake_case string in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User = 0,
    Manager = 1,
    Admin = 2,
}

impl UserRole {
    /// Convert from the stored wire value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::User),
            1 => Some(Self::Manager),
            2 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to the stored wire value.
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl PartialOrd for UserRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_i16().cmp(&other.as_i16())
    }
}

/// Lifecycle state of an account with respect to the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Registered but not yet approved / email-verified.
    Pending,
    Active,
    /// Explicitly denied access.
    Unauthorized,
    /// Deactivated by an administrator.
    Inactive,
}

impl AccountStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "unauthorized" => Some(Self::Unauthorized),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Unauthorized => "unauthorized",
            Self::Inactive => "inactive",
        }
    }
}

/// Per-module access switches attached to every account.
///
/// Stored as JSON; absent fields deserialize to `false` so new modules can
/// be added without migrating existing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulePermissions {
    pub documents: bool,
    pub training: bool,
    pub evaluations: bool,
    pub requests: bool,
    pub team_management: bool,
    pub administration: bool,
}

impl ModulePermissions {
    /// Default permission set granted when an account is created.
    pub fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::User => Self {
                documents: true,
                training: true,
                evaluations: true,
                requests: true,
                ..Self::default()
            },
            UserRole::Manager => Self {
                documents: true,
                training: true,
                evaluations: true,
                requests: true,
                team_management: true,
                ..Self::default()
            },
            UserRole::Admin => Self {
                documents: true,
                training: true,
                evaluations: true,
                requests: true,
                team_management: true,
                administration: true,
            },
        }
    }
}
