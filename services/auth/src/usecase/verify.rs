use ancora_domain::contract::{AuthStatus, DeliveryChannel, SessionOutcome};
use ancora_domain::identifier::Identifier;
use ancora_domain::user::AccountStatus;
use chrono::Utc;

use crate::domain::repository::{
    AccessEventRepository, AccountRepository, AuthorizationRepository, ChallengeRepository,
};
use crate::domain::types::AccessAction;
use crate::error::AuthServiceError;
use crate::usecase::token::issue_session_token;

pub struct VerifyCodeInput {
    pub identifier: String,
    pub code: String,
    pub remember: bool,
}

pub struct VerifyCodeUseCase<A, Z, C, E>
where
    A: AccountRepository,
    Z: AuthorizationRepository,
    C: ChallengeRepository,
    E: AccessEventRepository,
{
    pub accounts: A,
    pub authorizations: Z,
    pub challenges: C,
    pub events: E,
    pub jwt_secret: String,
}

impl<A, Z, C, E> VerifyCodeUseCase<A, Z, C, E>
where
    A: AccountRepository,
    Z: AuthorizationRepository,
    C: ChallengeRepository,
    E: AccessEventRepository,
{
    pub async fn execute(
        &self,
        input: VerifyCodeInput,
    ) -> Result<SessionOutcome, AuthServiceError> {
        let identifier = Identifier::parse(&input.identifier).ok_or_else(|| {
            AuthServiceError::Validation("enter a valid phone number or email".into())
        })?;

        // 1. Find account; an authorized identity with no row is routed to
        //    quick-registration, anything else gets the generic code error
        let account = match &identifier {
            Identifier::Email(email) => self.accounts.find_by_email(email).await?,
            Identifier::Phone(phone) => self.accounts.find_by_phone(phone).await?,
        };
        let account = match account {
            Some(account) => account,
            None => {
                let authorized = match &identifier {
                    Identifier::Email(email) => self
                        .authorizations
                        .find_active_for_email(email)
                        .await?
                        .is_some(),
                    Identifier::Phone(phone) => self
                        .authorizations
                        .find_active_for_phone(phone)
                        .await?
                        .is_some(),
                };
                if authorized {
                    let status = match identifier {
                        Identifier::Email(_) => AuthStatus::NewEmail,
                        Identifier::Phone(_) => AuthStatus::NewPhone,
                    };
                    return Ok(SessionOutcome::Blocked { status });
                }
                return Err(AuthServiceError::InvalidCode);
            }
        };

        // 2. Match the code against the active challenge per channel.
        //    Expired and wrong codes are indistinguishable to the caller.
        let now = Utc::now();
        let mut matched = None;
        for channel in [DeliveryChannel::Email, DeliveryChannel::Sms] {
            if let Some(challenge) = self.challenges.find_active(account.id, channel).await? {
                if challenge.code == input.code && !challenge.is_expired(now) {
                    matched = Some(challenge);
                    break;
                }
            }
        }
        let challenge = matched.ok_or(AuthServiceError::InvalidCode)?;
        self.challenges.consume(challenge.id).await?;

        // 3. An answered email challenge completes email verification
        let mut account = account;
        if challenge.channel == DeliveryChannel::Email && !account.email_verified {
            self.accounts.mark_verified(account.id).await?;
            account.email_verified = true;
            if account.status == AccountStatus::Pending {
                account.status = AccountStatus::Active;
            }
        }

        // 4. The account itself may still be blocked
        if let Some(status) = account.blocking_status() {
            return Ok(SessionOutcome::Blocked { status });
        }

        // 5. Session
        self.events
            .record(Some(account.id), AccessAction::Login, Some("code"))
            .await?;
        let requires_password = account.password_hash.is_none();
        let (token, _exp) = issue_session_token(&account, input.remember, &self.jwt_secret)?;

        Ok(SessionOutcome::Authenticated {
            token,
            requires_password,
            profile: account.profile(),
        })
    }
}
