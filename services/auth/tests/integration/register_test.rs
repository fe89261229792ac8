use uuid::Uuid;

use ancora_auth::domain::repository::ProviderIdentity;
use ancora_auth::domain::types::AccessAction;
use ancora_auth::error::AuthServiceError;
use ancora_auth::usecase::register::{QuickRegisterUseCase, RegisterInput};
use ancora_domain::contract::{DeliveryChannel, RegisterOutcome};

use crate::helpers::{
    MockAccountRepo, MockAuthorizationRepo, MockChallengeRepo, MockDelivery, MockEventRepo,
    MockProvider, invite_entry, test_account,
};

fn valid_input() -> RegisterInput {
    RegisterInput {
        first_name: "Bruno".to_owned(),
        last_name: "Lima".to_owned(),
        phone: "+5521987654321".to_owned(),
        email: "bruno@example.com".to_owned(),
        tax_id: "123.456.789-01".to_owned(),
        password: "long-enough-password".to_owned(),
        invite_code: Some("AB23CD45".to_owned()),
        position: None,
        department: None,
    }
}

fn usecase(
    accounts: MockAccountRepo,
    authorizations: MockAuthorizationRepo,
    provider: MockProvider,
) -> QuickRegisterUseCase<
    MockAccountRepo,
    MockAuthorizationRepo,
    MockChallengeRepo,
    MockDelivery,
    MockEventRepo,
    MockProvider,
> {
    QuickRegisterUseCase {
        accounts,
        authorizations,
        challenges: MockChallengeRepo::empty(),
        delivery: MockDelivery::working(),
        events: MockEventRepo::empty(),
        provider,
        code_ttl_minutes: 15,
    }
}

#[tokio::test]
async fn should_register_fresh_identity_with_invite() {
    let accounts = MockAccountRepo::empty();
    let created = accounts.handle();
    let authorizations = MockAuthorizationRepo::new(vec![invite_entry("AB23CD45")]);
    let entries = authorizations.handle();
    let provider = MockProvider::empty();
    let identities = provider.handle();

    let challenges = MockChallengeRepo::empty();
    let stored = challenges.handle();
    let events = MockEventRepo::empty();
    let recorded = events.handle();

    let uc = QuickRegisterUseCase {
        accounts,
        authorizations,
        challenges,
        delivery: MockDelivery::working(),
        events,
        provider,
        code_ttl_minutes: 15,
    };

    let out = uc.execute(valid_input()).await.unwrap();
    assert_eq!(
        out,
        RegisterOutcome::Registered {
            channel: DeliveryChannel::Email
        }
    );

    let created = created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let account = &created[0];
    // Bound to the provider id, normalized inputs, unverified until the
    // emailed code is answered.
    assert_eq!(account.id, identities.lock().unwrap()[0].id);
    assert_eq!(account.email.as_deref(), Some("bruno@example.com"));
    assert_eq!(account.tax_id.as_deref(), Some("12345678901"));
    assert!(!account.email_verified);
    assert!(account.password_hash.is_some());
    assert!(account.protocol.is_some());

    assert_eq!(entries.lock().unwrap()[0].used_count, 1);
    assert_eq!(stored.lock().unwrap().len(), 1);
    assert!(recorded
        .lock()
        .unwrap()
        .iter()
        .any(|(_, a, _)| *a == AccessAction::Registered));
}

#[tokio::test]
async fn should_reject_registration_without_authorization() {
    let mut input = valid_input();
    input.invite_code = None;

    let uc = usecase(
        MockAccountRepo::empty(),
        MockAuthorizationRepo::empty(),
        MockProvider::empty(),
    );

    let result = uc.execute(input).await;
    assert!(matches!(result, Err(AuthServiceError::NotAuthorized)));
}

#[tokio::test]
async fn should_reject_spent_invite() {
    let mut invite = invite_entry("AB23CD45");
    invite.used_count = 1;

    let uc = usecase(
        MockAccountRepo::empty(),
        MockAuthorizationRepo::new(vec![invite]),
        MockProvider::empty(),
    );

    let result = uc.execute(valid_input()).await;
    assert!(matches!(result, Err(AuthServiceError::NotAuthorized)));
}

#[tokio::test]
async fn should_resend_code_when_local_account_is_unverified() {
    let mut account = test_account();
    account.email = Some("bruno@example.com".to_owned());
    account.email_verified = false;

    let provider = MockProvider::new(vec![ProviderIdentity {
        id: account.id,
        email: "bruno@example.com".to_owned(),
        email_verified: false,
    }]);

    let challenges = MockChallengeRepo::empty();
    let stored = challenges.handle();

    let uc = QuickRegisterUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        authorizations: MockAuthorizationRepo::new(vec![invite_entry("AB23CD45")]),
        challenges,
        delivery: MockDelivery::working(),
        events: MockEventRepo::empty(),
        provider,
        code_ttl_minutes: 15,
    };

    let out = uc.execute(valid_input()).await.unwrap();
    assert_eq!(
        out,
        RegisterOutcome::VerificationResent {
            channel: DeliveryChannel::Email
        }
    );
    assert_eq!(stored.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_conflict_when_local_account_is_verified() {
    let mut account = test_account();
    account.email = Some("bruno@example.com".to_owned());
    account.email_verified = true;

    let provider = MockProvider::new(vec![ProviderIdentity {
        id: account.id,
        email: "bruno@example.com".to_owned(),
        email_verified: true,
    }]);

    let uc = usecase(
        MockAccountRepo::new(vec![account]),
        MockAuthorizationRepo::new(vec![invite_entry("AB23CD45")]),
        provider,
    );

    let result = uc.execute(valid_input()).await;
    assert!(matches!(
        result,
        Err(AuthServiceError::RegistrationConflict)
    ));
}

#[tokio::test]
async fn should_reconcile_orphaned_provider_identity_into_one_row() {
    let orphan_id = Uuid::new_v4();
    let provider = MockProvider::new(vec![ProviderIdentity {
        id: orphan_id,
        email: "bruno@example.com".to_owned(),
        email_verified: false,
    }]);

    let accounts = MockAccountRepo::empty();
    let handle = accounts.handle();
    let events = MockEventRepo::empty();
    let recorded = events.handle();

    let uc = QuickRegisterUseCase {
        accounts,
        authorizations: MockAuthorizationRepo::new(vec![invite_entry("AB23CD45")]),
        challenges: MockChallengeRepo::empty(),
        delivery: MockDelivery::working(),
        events,
        provider,
        code_ttl_minutes: 15,
    };

    let out = uc.execute(valid_input()).await.unwrap();
    assert_eq!(
        out,
        RegisterOutcome::Registered {
            channel: DeliveryChannel::Email
        }
    );

    {
        let accounts = handle.lock().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, orphan_id, "row must adopt the provider id");
        assert!(recorded
            .lock()
            .unwrap()
            .iter()
            .any(|(_, a, _)| *a == AccessAction::Reconciled));
    }

    // Running it again converges: the local row now exists unverified, so
    // the second attempt becomes a resend, never a second row.
    let again = uc.execute(valid_input()).await.unwrap();
    assert_eq!(
        again,
        RegisterOutcome::VerificationResent {
            channel: DeliveryChannel::Email
        }
    );
    assert_eq!(handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_malformed_tax_id() {
    let mut input = valid_input();
    input.tax_id = "12345".to_owned();

    let uc = usecase(
        MockAccountRepo::empty(),
        MockAuthorizationRepo::new(vec![invite_entry("AB23CD45")]),
        MockProvider::empty(),
    );

    let result = uc.execute(input).await;
    assert!(matches!(result, Err(AuthServiceError::Validation(_))));
}
