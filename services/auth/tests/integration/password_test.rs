use chrono::{Duration, Utc};

use ancora_auth::domain::types::{AccessAction, MAX_FAILED_LOGINS};
use ancora_auth::error::AuthServiceError;
use ancora_auth::usecase::password::{
    PasswordLoginInput, PasswordLoginUseCase, SetPasswordInput, SetPasswordUseCase, hash_password,
    verify_password,
};
use ancora_domain::contract::{AuthStatus, SessionOutcome};
use ancora_domain::user::UserRole;

use crate::helpers::{
    MockAccountRepo, MockEventRepo, TEST_EMAIL, TEST_JWT_SECRET, test_account,
};

fn usecase(accounts: MockAccountRepo) -> PasswordLoginUseCase<MockAccountRepo, MockEventRepo> {
    PasswordLoginUseCase {
        accounts,
        events: MockEventRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        admin_email: String::new(),
        admin_phone: String::new(),
        admin_password: String::new(),
    }
}

fn login(password: &str) -> PasswordLoginInput {
    PasswordLoginInput {
        identifier: TEST_EMAIL.to_owned(),
        password: password.to_owned(),
        remember: false,
    }
}

#[tokio::test]
async fn should_authenticate_with_correct_password() {
    let mut account = test_account();
    account.password_hash = Some(hash_password("correct-horse").unwrap());

    let uc = usecase(MockAccountRepo::new(vec![account.clone()]));

    let out = uc.execute(login("correct-horse")).await.unwrap();
    match out {
        SessionOutcome::Authenticated {
            requires_password,
            profile,
            ..
        } => {
            assert!(!requires_password);
            assert_eq!(profile.id, account.id);
        }
        other => panic!("expected Authenticated, got {other:?}"),
    }
}

#[tokio::test]
async fn should_count_failures_and_lock_at_the_limit() {
    let mut account = test_account();
    account.password_hash = Some(hash_password("correct-horse").unwrap());
    account.failed_login_attempts = MAX_FAILED_LOGINS - 1;

    let accounts = MockAccountRepo::new(vec![account]);
    let handle = accounts.handle();
    let events = MockEventRepo::empty();
    let recorded = events.handle();

    let uc = PasswordLoginUseCase {
        accounts,
        events,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        admin_email: String::new(),
        admin_phone: String::new(),
        admin_password: String::new(),
    };

    let result = uc.execute(login("wrong-horse")).await;
    assert!(matches!(result, Err(AuthServiceError::AccountLocked)));

    let accounts = handle.lock().unwrap();
    assert_eq!(accounts[0].failed_login_attempts, MAX_FAILED_LOGINS);
    assert!(accounts[0].lock_until.is_some());

    let recorded = recorded.lock().unwrap();
    assert!(recorded.iter().any(|(_, a, _)| *a == AccessAction::AccountLocked));
}

#[tokio::test]
async fn should_reject_wrong_password_below_the_limit() {
    let mut account = test_account();
    account.password_hash = Some(hash_password("correct-horse").unwrap());

    let accounts = MockAccountRepo::new(vec![account]);
    let handle = accounts.handle();

    let uc = usecase(accounts);

    let result = uc.execute(login("wrong-horse")).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
    assert_eq!(handle.lock().unwrap()[0].failed_login_attempts, 1);
}

#[tokio::test]
async fn should_refuse_login_while_locked_even_with_correct_password() {
    let mut account = test_account();
    account.password_hash = Some(hash_password("correct-horse").unwrap());
    account.lock_until = Some(Utc::now() + Duration::minutes(10));

    let uc = usecase(MockAccountRepo::new(vec![account]));

    let result = uc.execute(login("correct-horse")).await;
    assert!(matches!(result, Err(AuthServiceError::AccountLocked)));
}

#[tokio::test]
async fn should_clear_failure_count_on_success() {
    let mut account = test_account();
    account.password_hash = Some(hash_password("correct-horse").unwrap());
    account.failed_login_attempts = 3;

    let accounts = MockAccountRepo::new(vec![account]);
    let handle = accounts.handle();

    let uc = usecase(accounts);

    uc.execute(login("correct-horse")).await.unwrap();
    assert_eq!(handle.lock().unwrap()[0].failed_login_attempts, 0);
}

#[tokio::test]
async fn should_report_blocked_status_instead_of_session() {
    let mut account = test_account();
    account.password_hash = Some(hash_password("correct-horse").unwrap());
    account.status = ancora_domain::user::AccountStatus::Pending;

    let uc = usecase(MockAccountRepo::new(vec![account]));

    let out = uc.execute(login("correct-horse")).await.unwrap();
    assert_eq!(
        out,
        SessionOutcome::Blocked {
            status: AuthStatus::Pending
        }
    );
}

#[tokio::test]
async fn should_bootstrap_admin_row_on_first_password_login() {
    let accounts = MockAccountRepo::empty();
    let handle = accounts.handle();

    let uc = PasswordLoginUseCase {
        accounts,
        events: MockEventRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        admin_email: "root@example.com".to_owned(),
        admin_phone: String::new(),
        admin_password: "super-secret-admin".to_owned(),
    };

    let out = uc
        .execute(PasswordLoginInput {
            identifier: "root@example.com".to_owned(),
            password: "super-secret-admin".to_owned(),
            remember: false,
        })
        .await
        .unwrap();

    assert!(matches!(out, SessionOutcome::Authenticated { .. }));

    let accounts = handle.lock().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].role, UserRole::Admin);
    assert!(accounts[0].password_hash.is_some());
}

#[tokio::test]
async fn should_not_bootstrap_admin_with_wrong_password() {
    let accounts = MockAccountRepo::empty();
    let handle = accounts.handle();

    let uc = PasswordLoginUseCase {
        accounts,
        events: MockEventRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        admin_email: "root@example.com".to_owned(),
        admin_phone: String::new(),
        admin_password: "super-secret-admin".to_owned(),
    };

    let result = uc
        .execute(PasswordLoginInput {
            identifier: "root@example.com".to_owned(),
            password: "guess".to_owned(),
            remember: false,
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
    assert!(handle.lock().unwrap().is_empty());
}

// ── Set password ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_set_password_hash_for_existing_account() {
    let account = test_account();
    let accounts = MockAccountRepo::new(vec![account.clone()]);
    let handle = accounts.handle();

    let uc = SetPasswordUseCase { accounts };

    uc.execute(SetPasswordInput {
        account_id: account.id,
        password: "brand-new-password".to_owned(),
    })
    .await
    .unwrap();

    let accounts = handle.lock().unwrap();
    let hash = accounts[0].password_hash.as_ref().unwrap();
    assert!(verify_password("brand-new-password", hash).unwrap());
}

#[tokio::test]
async fn should_reject_short_password() {
    let uc = SetPasswordUseCase {
        accounts: MockAccountRepo::new(vec![test_account()]),
    };

    let result = uc
        .execute(SetPasswordInput {
            account_id: test_account().id,
            password: "short".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AuthServiceError::Validation(_))));
}
