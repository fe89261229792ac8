use uuid::Uuid;

use ancora_auth::domain::types::{AuthorizationStatus, INVITE_CODE_LEN};
use ancora_auth::error::AuthServiceError;
use ancora_auth::usecase::authorization::{
    CreateAllowlistEntryUseCase, CreateAllowlistInput, ListPendingRequestsUseCase, MintInviteInput,
    MintInviteUseCase,
};
use ancora_domain::pagination::PageRequest;

use crate::helpers::MockAuthorizationRepo;

fn admin_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-0000000000aa").unwrap()
}

#[tokio::test]
async fn should_create_normalized_allowlist_entry() {
    let authorizations = MockAuthorizationRepo::empty();
    let entries = authorizations.handle();

    let uc = CreateAllowlistEntryUseCase { authorizations };

    let entry = uc
        .execute(CreateAllowlistInput {
            email: Some("  New.Hire@Example.COM ".to_owned()),
            phone: None,
            email_domain: Some("@example.com".to_owned()),
            note: Some("marketing onboarding".to_owned()),
            created_by: admin_id(),
        })
        .await
        .unwrap();

    assert_eq!(entry.email.as_deref(), Some("new.hire@example.com"));
    assert_eq!(entry.email_domain.as_deref(), Some("example.com"));
    assert_eq!(entry.status, AuthorizationStatus::Active);
    assert_eq!(entry.created_by, Some(admin_id()));
    assert_eq!(entries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_require_at_least_one_identity_field() {
    let uc = CreateAllowlistEntryUseCase {
        authorizations: MockAuthorizationRepo::empty(),
    };

    let result = uc
        .execute(CreateAllowlistInput {
            email: None,
            phone: None,
            email_domain: None,
            note: None,
            created_by: admin_id(),
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::Validation(_))));
}

#[tokio::test]
async fn should_mint_single_use_invite_by_default() {
    let uc = MintInviteUseCase {
        authorizations: MockAuthorizationRepo::empty(),
    };

    let entry = uc
        .execute(MintInviteInput {
            max_uses: None,
            expires_at: None,
            note: None,
            created_by: admin_id(),
        })
        .await
        .unwrap();

    let code = entry.invite_code.unwrap();
    assert_eq!(code.len(), INVITE_CODE_LEN);
    assert_eq!(entry.max_uses, Some(1));
    assert_eq!(entry.used_count, 0);
    assert_eq!(entry.status, AuthorizationStatus::Active);
}

#[tokio::test]
async fn should_reject_non_positive_invite_use_cap() {
    let uc = MintInviteUseCase {
        authorizations: MockAuthorizationRepo::empty(),
    };

    let result = uc
        .execute(MintInviteInput {
            max_uses: Some(0),
            expires_at: None,
            note: None,
            created_by: admin_id(),
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::Validation(_))));
}

#[tokio::test]
async fn should_list_only_pending_requests() {
    use crate::helpers::{allowlist_email_entry, invite_entry};

    let mut pending = allowlist_email_entry("waiting@example.com");
    pending.status = AuthorizationStatus::Pending;

    let uc = ListPendingRequestsUseCase {
        authorizations: MockAuthorizationRepo::new(vec![
            allowlist_email_entry("approved@example.com"),
            invite_entry("AB23CD45"),
            pending,
        ]),
    };

    let entries = uc.execute(PageRequest::default()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].email.as_deref(), Some("waiting@example.com"));
}
