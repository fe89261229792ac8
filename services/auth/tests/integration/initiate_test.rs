use ancora_auth::domain::types::{AccessAction, CODE_LEN};
use ancora_auth::error::AuthServiceError;
use ancora_auth::usecase::initiate::{InitiateLoginInput, InitiateLoginUseCase};
use ancora_domain::contract::{AuthStatus, DeliveryChannel, InitiateOutcome};
use ancora_domain::user::AccountStatus;

use crate::helpers::{
    MockAccountRepo, MockAuthorizationRepo, MockChallengeRepo, MockDelivery, MockEventRepo,
    TEST_EMAIL, TEST_PHONE, allowlist_email_entry, invite_entry, test_account,
};

fn usecase(
    accounts: MockAccountRepo,
    authorizations: MockAuthorizationRepo,
    challenges: MockChallengeRepo,
    delivery: MockDelivery,
) -> InitiateLoginUseCase<
    MockAccountRepo,
    MockAuthorizationRepo,
    MockChallengeRepo,
    MockDelivery,
    MockEventRepo,
> {
    InitiateLoginUseCase {
        accounts,
        authorizations,
        challenges,
        delivery,
        events: MockEventRepo::empty(),
        admin_email: String::new(),
        admin_phone: String::new(),
        code_ttl_minutes: 15,
    }
}

#[tokio::test]
async fn should_short_circuit_to_password_when_account_has_one() {
    let mut account = test_account();
    account.password_hash = Some("$argon2id$stub".to_owned());

    let delivery = MockDelivery::working();
    let sends = delivery.handle();

    let uc = usecase(
        MockAccountRepo::new(vec![account]),
        MockAuthorizationRepo::empty(),
        MockChallengeRepo::empty(),
        delivery,
    );

    let out = uc
        .execute(InitiateLoginInput {
            identifier: TEST_EMAIL.to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();

    assert_eq!(out, InitiateOutcome::HasPassword);
    assert!(sends.lock().unwrap().is_empty(), "no code should be sent");
}

#[tokio::test]
async fn should_send_code_to_known_account_without_password() {
    let delivery = MockDelivery::working();
    let sends = delivery.handle();
    let challenges = MockChallengeRepo::empty();
    let stored = challenges.handle();

    let uc = usecase(
        MockAccountRepo::new(vec![test_account()]),
        MockAuthorizationRepo::empty(),
        challenges,
        delivery,
    );

    let out = uc
        .execute(InitiateLoginInput {
            identifier: TEST_EMAIL.to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();

    assert_eq!(
        out,
        InitiateOutcome::CodeSent {
            channel: DeliveryChannel::Email
        }
    );

    let sends = sends.lock().unwrap();
    assert_eq!(sends.len(), 1);
    let (channel, recipient, code) = &sends[0];
    assert_eq!(*channel, DeliveryChannel::Email);
    assert_eq!(recipient, TEST_EMAIL);
    assert_eq!(code.len(), CODE_LEN);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(&stored[0].code, code, "stored code must match the sent one");
}

#[tokio::test]
async fn should_prefer_sms_for_phone_identifier() {
    let delivery = MockDelivery::working();
    let sends = delivery.handle();

    let uc = usecase(
        MockAccountRepo::new(vec![test_account()]),
        MockAuthorizationRepo::empty(),
        MockChallengeRepo::empty(),
        delivery,
    );

    let out = uc
        .execute(InitiateLoginInput {
            identifier: TEST_PHONE.to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();

    assert_eq!(
        out,
        InitiateOutcome::CodeSent {
            channel: DeliveryChannel::Sms
        }
    );
    assert_eq!(sends.lock().unwrap()[0].1, TEST_PHONE);
}

#[tokio::test]
async fn should_supersede_previous_code_on_resend() {
    let challenges = MockChallengeRepo::empty();
    let stored = challenges.handle();
    let delivery = MockDelivery::working();
    let sends = delivery.handle();

    let uc = usecase(
        MockAccountRepo::new(vec![test_account()]),
        MockAuthorizationRepo::empty(),
        challenges,
        delivery,
    );

    for _ in 0..2 {
        uc.execute(InitiateLoginInput {
            identifier: TEST_EMAIL.to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();
    }

    let stored = stored.lock().unwrap();
    assert_eq!(stored.len(), 1, "only the latest code may stay active");
    let last_sent = &sends.lock().unwrap()[1].2;
    assert_eq!(&stored[0].code, last_sent);
}

#[tokio::test]
async fn should_file_exactly_one_access_request_for_unknown_identity() {
    let authorizations = MockAuthorizationRepo::empty();
    let entries = authorizations.handle();

    let uc = usecase(
        MockAccountRepo::empty(),
        authorizations,
        MockChallengeRepo::empty(),
        MockDelivery::working(),
    );

    let first = uc
        .execute(InitiateLoginInput {
            identifier: "new@example.com".to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();
    assert_eq!(
        first,
        InitiateOutcome::Blocked {
            status: AuthStatus::Unauthorized
        }
    );
    assert_eq!(entries.lock().unwrap().len(), 1);

    // A retry reports the already-filed request instead of filing another.
    let second = uc
        .execute(InitiateLoginInput {
            identifier: "new@example.com".to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();
    assert_eq!(
        second,
        InitiateOutcome::Blocked {
            status: AuthStatus::Pending
        }
    );
    assert_eq!(entries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_create_placeholder_for_allowlisted_identity() {
    let accounts = MockAccountRepo::empty();
    let created = accounts.handle();

    let delivery = MockDelivery::working();
    let events = MockEventRepo::empty();
    let recorded = events.handle();

    let uc = InitiateLoginUseCase {
        accounts,
        authorizations: MockAuthorizationRepo::new(vec![allowlist_email_entry(
            "new@example.com",
        )]),
        challenges: MockChallengeRepo::empty(),
        delivery,
        events,
        admin_email: String::new(),
        admin_phone: String::new(),
        code_ttl_minutes: 15,
    };

    let out = uc
        .execute(InitiateLoginInput {
            identifier: "new@example.com".to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();

    assert_eq!(
        out,
        InitiateOutcome::CodeSent {
            channel: DeliveryChannel::Email
        }
    );

    let created = created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].email.as_deref(), Some("new@example.com"));
    assert!(created[0].password_hash.is_none());

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded[0].1, AccessAction::Created);
}

#[tokio::test]
async fn should_route_admin_identifier_to_password_without_account() {
    let uc = InitiateLoginUseCase {
        accounts: MockAccountRepo::empty(),
        authorizations: MockAuthorizationRepo::empty(),
        challenges: MockChallengeRepo::empty(),
        delivery: MockDelivery::working(),
        events: MockEventRepo::empty(),
        admin_email: "root@example.com".to_owned(),
        admin_phone: String::new(),
        code_ttl_minutes: 15,
    };

    let out = uc
        .execute(InitiateLoginInput {
            identifier: "root@example.com".to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();

    assert_eq!(out, InitiateOutcome::HasPassword);
}

#[tokio::test]
async fn should_surface_delivery_failure_verbatim() {
    let uc = usecase(
        MockAccountRepo::new(vec![test_account()]),
        MockAuthorizationRepo::empty(),
        MockChallengeRepo::empty(),
        MockDelivery::failing(),
    );

    let result = uc
        .execute(InitiateLoginInput {
            identifier: TEST_EMAIL.to_owned(),
            invite_code: None,
        })
        .await;

    match result {
        Err(AuthServiceError::DeliveryFailed(message)) => {
            assert_eq!(message, "sms quota exceeded for account");
        }
        other => panic!("expected DeliveryFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_malformed_identifier() {
    let uc = usecase(
        MockAccountRepo::empty(),
        MockAuthorizationRepo::empty(),
        MockChallengeRepo::empty(),
        MockDelivery::working(),
    );

    let result = uc
        .execute(InitiateLoginInput {
            identifier: "not-an-identifier".to_owned(),
            invite_code: None,
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::Validation(_))));
}

#[tokio::test]
async fn should_report_pending_before_the_password_short_circuit() {
    let mut account = test_account();
    account.active = false;
    account.status = AccountStatus::Pending;
    account.password_hash = Some("$argon2id$stub".to_owned());

    let uc = usecase(
        MockAccountRepo::new(vec![account]),
        MockAuthorizationRepo::empty(),
        MockChallengeRepo::empty(),
        MockDelivery::working(),
    );

    let out = uc
        .execute(InitiateLoginInput {
            identifier: TEST_EMAIL.to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();

    // Approval is what the account is waiting on, not a password prompt.
    assert_eq!(
        out,
        InitiateOutcome::Blocked {
            status: AuthStatus::Pending
        }
    );
}

#[tokio::test]
async fn should_route_deactivated_pending_account_back_to_registration() {
    let mut account = test_account();
    account.active = false;
    account.status = AccountStatus::Pending;
    account.email_verified = false;

    let uc = usecase(
        MockAccountRepo::new(vec![account]),
        MockAuthorizationRepo::empty(),
        MockChallengeRepo::empty(),
        MockDelivery::working(),
    );

    let out = uc
        .execute(InitiateLoginInput {
            identifier: TEST_EMAIL.to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();

    assert_eq!(
        out,
        InitiateOutcome::Blocked {
            status: AuthStatus::PendingRegistration
        }
    );
}

#[tokio::test]
async fn should_admit_unknown_identity_with_invite_and_spend_it() {
    let authorizations = MockAuthorizationRepo::new(vec![invite_entry("AB23CD45")]);
    let entries = authorizations.handle();
    let accounts = MockAccountRepo::empty();
    let created = accounts.handle();

    let uc = InitiateLoginUseCase {
        accounts,
        authorizations,
        challenges: MockChallengeRepo::empty(),
        delivery: MockDelivery::working(),
        events: MockEventRepo::empty(),
        admin_email: String::new(),
        admin_phone: String::new(),
        code_ttl_minutes: 15,
    };

    let out = uc
        .execute(InitiateLoginInput {
            identifier: "invited@example.com".to_owned(),
            invite_code: Some("AB23CD45".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(
        out,
        InitiateOutcome::CodeSent {
            channel: DeliveryChannel::Email
        }
    );
    assert_eq!(created.lock().unwrap().len(), 1);
    assert_eq!(entries.lock().unwrap()[0].used_count, 1);

    // The single-use invite is spent; the next identity queues up instead.
    let second = uc
        .execute(InitiateLoginInput {
            identifier: "latecomer@example.com".to_owned(),
            invite_code: Some("AB23CD45".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(
        second,
        InitiateOutcome::Blocked {
            status: AuthStatus::Unauthorized
        }
    );
    assert_eq!(created.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_report_blocked_status_for_inactive_account() {
    let mut account = test_account();
    account.active = false;

    let uc = usecase(
        MockAccountRepo::new(vec![account]),
        MockAuthorizationRepo::empty(),
        MockChallengeRepo::empty(),
        MockDelivery::working(),
    );

    let out = uc
        .execute(InitiateLoginInput {
            identifier: TEST_EMAIL.to_owned(),
            invite_code: None,
        })
        .await
        .unwrap();

    assert_eq!(
        out,
        InitiateOutcome::Blocked {
            status: AuthStatus::Inactive
        }
    );
}
