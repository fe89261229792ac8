use ancora_domain::identifier;
use ancora_domain::pagination::PageRequest;
use chrono::{DateTime, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::AuthorizationRepository;
use crate::domain::types::{AuthorizationEntry, AuthorizationStatus, INVITE_CODE_LEN};
use crate::error::AuthServiceError;

// 0/O and 1/I are excluded so codes survive being read over the phone.
const INVITE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

fn generate_invite_code() -> String {
    let mut rng = rand::rng();
    (0..INVITE_CODE_LEN)
        .map(|_| char::from(INVITE_CHARSET[rng.random_range(0..INVITE_CHARSET.len())]))
        .collect()
}

// ── Allow-list ───────────────────────────────────────────────────────────────

pub struct CreateAllowlistInput {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub email_domain: Option<String>,
    pub note: Option<String>,
    pub created_by: Uuid,
}

pub struct CreateAllowlistEntryUseCase<Z: AuthorizationRepository> {
    pub authorizations: Z,
}

impl<Z: AuthorizationRepository> CreateAllowlistEntryUseCase<Z> {
    pub async fn execute(
        &self,
        input: CreateAllowlistInput,
    ) -> Result<AuthorizationEntry, AuthServiceError> {
        let email = input
            .email
            .map(|e| e.trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty());
        let phone = input
            .phone
            .map(|p| identifier::normalize_phone(&p))
            .filter(|p| !p.is_empty());
        let email_domain = input
            .email_domain
            .map(|d| d.trim().trim_start_matches('@').to_ascii_lowercase())
            .filter(|d| !d.is_empty());

        if email.is_none() && phone.is_none() && email_domain.is_none() {
            return Err(AuthServiceError::Validation(
                "an email, phone number or email domain is required".into(),
            ));
        }
        if let Some(email) = &email {
            if !identifier::is_valid_email(email) {
                return Err(AuthServiceError::Validation("enter a valid email".into()));
            }
        }
        if let Some(phone) = &phone {
            if !identifier::is_valid_phone(phone) {
                return Err(AuthServiceError::Validation(
                    "enter a valid phone number".into(),
                ));
            }
        }

        let now = Utc::now();
        let entry = AuthorizationEntry {
            id: Uuid::new_v4(),
            email,
            phone_number: phone,
            email_domain,
            invite_code: None,
            status: AuthorizationStatus::Active,
            max_uses: None,
            used_count: 0,
            expires_at: None,
            created_by: Some(input.created_by),
            note: input.note,
            created_at: now,
            updated_at: now,
        };
        self.authorizations.create(&entry).await?;
        Ok(entry)
    }
}

// ── Invites ──────────────────────────────────────────────────────────────────

pub struct MintInviteInput {
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub created_by: Uuid,
}

pub struct MintInviteUseCase<Z: AuthorizationRepository> {
    pub authorizations: Z,
}

impl<Z: AuthorizationRepository> MintInviteUseCase<Z> {
    pub async fn execute(
        &self,
        input: MintInviteInput,
    ) -> Result<AuthorizationEntry, AuthServiceError> {
        if input.max_uses.is_some_and(|n| n < 1) {
            return Err(AuthServiceError::Validation(
                "max_uses must be at least 1".into(),
            ));
        }

        let now = Utc::now();
        let entry = AuthorizationEntry {
            id: Uuid::new_v4(),
            email: None,
            phone_number: None,
            email_domain: None,
            invite_code: Some(generate_invite_code()),
            status: AuthorizationStatus::Active,
            // Single-use unless the admin says otherwise
            max_uses: input.max_uses.or(Some(1)),
            used_count: 0,
            expires_at: input.expires_at,
            created_by: Some(input.created_by),
            note: input.note,
            created_at: now,
            updated_at: now,
        };
        self.authorizations.create(&entry).await?;
        Ok(entry)
    }
}

// ── Pending access requests ──────────────────────────────────────────────────

pub struct ListPendingRequestsUseCase<Z: AuthorizationRepository> {
    pub authorizations: Z,
}

impl<Z: AuthorizationRepository> ListPendingRequestsUseCase<Z> {
    pub async fn execute(
        &self,
        page: PageRequest,
    ) -> Result<Vec<AuthorizationEntry>, AuthServiceError> {
        self.authorizations.list_pending(page).await
    }
}
