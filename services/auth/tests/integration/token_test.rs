use jsonwebtoken::{EncodingKey, Header, encode};

use ancora_auth::error::AuthServiceError;
use ancora_auth::usecase::token::{
    CheckSessionUseCase, RefreshTokenUseCase, RepairTokenUseCase, issue_session_token,
};
use ancora_auth_types::token::{JwtClaims, validate_access_token};
use ancora_domain::contract::{AuthStatus, SessionOutcome};

use crate::helpers::{MockAccountRepo, TEST_JWT_SECRET, test_account};

fn expired_token(account_id: uuid::Uuid, remember: bool) -> String {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = JwtClaims {
        sub: account_id.to_string(),
        phone: None,
        role: 0,
        exp: now - 3600,
        remember,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn should_refresh_live_token_keeping_remember_horizon() {
    let account = test_account();
    let (token, _) = issue_session_token(&account, true, TEST_JWT_SECRET).unwrap();

    let uc = RefreshTokenUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = uc.execute(&token).await.unwrap();
    let SessionOutcome::Authenticated { token: fresh, .. } = out else {
        panic!("expected Authenticated");
    };
    let info = validate_access_token(&fresh, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.account_id, account.id);
    assert!(info.remember, "refresh must keep the remember horizon");
}

#[tokio::test]
async fn should_reject_expired_token_on_refresh() {
    let account = test_account();
    let token = expired_token(account.id, false);

    let uc = RefreshTokenUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute(&token).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
}

#[tokio::test]
async fn should_repair_expired_but_authentic_token() {
    let account = test_account();
    let token = expired_token(account.id, false);

    let uc = RepairTokenUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = uc.execute(&token).await.unwrap();
    let SessionOutcome::Authenticated { token: fresh, .. } = out else {
        panic!("expected Authenticated");
    };
    let info = validate_access_token(&fresh, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.account_id, account.id);
}

#[tokio::test]
async fn should_not_repair_token_signed_with_other_secret() {
    let account = test_account();
    let (token, _) = issue_session_token(&account, false, "some-other-secret").unwrap();

    let uc = RepairTokenUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute(&token).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
}

#[tokio::test]
async fn should_block_refresh_when_account_became_inactive() {
    let mut account = test_account();
    let (token, _) = issue_session_token(&account, false, TEST_JWT_SECRET).unwrap();
    account.active = false;

    let uc = RefreshTokenUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = uc.execute(&token).await.unwrap();
    assert_eq!(
        out,
        SessionOutcome::Blocked {
            status: AuthStatus::Inactive
        }
    );
}

#[tokio::test]
async fn should_reject_repair_for_deleted_account() {
    let account = test_account();
    let token = expired_token(account.id, false);

    let uc = RepairTokenUseCase {
        accounts: MockAccountRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute(&token).await;
    assert!(matches!(result, Err(AuthServiceError::InvalidToken)));
}

#[tokio::test]
async fn should_echo_session_profile_and_expiry() {
    let account = test_account();
    let (token, exp) = issue_session_token(&account, false, TEST_JWT_SECRET).unwrap();

    let uc = CheckSessionUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let info = uc.execute(&token).await.unwrap();
    assert_eq!(info.profile.id, account.id);
    assert_eq!(info.exp, exp);
    assert!(!info.remember);
}
