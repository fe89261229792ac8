use ancora_domain::contract::{AuthStatus, DeliveryChannel, InitiateOutcome};
use ancora_domain::identifier::Identifier;
use ancora_domain::user::{AccountStatus, ModulePermissions, UserRole};
use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{
    AccessEventRepository, AccountRepository, AuthorizationRepository, ChallengeRepository,
    CodeDeliveryPort,
};
use crate::domain::types::{
    AccessAction, Account, AuthorizationEntry, AuthorizationStatus, CODE_LEN,
    VerificationChallenge,
};
use crate::error::AuthServiceError;

pub(crate) fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

pub struct InitiateLoginInput {
    pub identifier: String,
    pub invite_code: Option<String>,
}

pub struct InitiateLoginUseCase<A, Z, C, D, E>
where
    A: AccountRepository,
    Z: AuthorizationRepository,
    C: ChallengeRepository,
    D: CodeDeliveryPort,
    E: AccessEventRepository,
{
    pub accounts: A,
    pub authorizations: Z,
    pub challenges: C,
    pub delivery: D,
    pub events: E,
    pub admin_email: String,
    pub admin_phone: String,
    pub code_ttl_minutes: i64,
}

impl<A, Z, C, D, E> InitiateLoginUseCase<A, Z, C, D, E>
where
    A: AccountRepository,
    Z: AuthorizationRepository,
    C: ChallengeRepository,
    D: CodeDeliveryPort,
    E: AccessEventRepository,
{
    pub async fn execute(
        &self,
        input: InitiateLoginInput,
    ) -> Result<InitiateOutcome, AuthServiceError> {
        // 1. Re-validate the identifier shape
        let identifier = Identifier::parse(&input.identifier).ok_or_else(|| {
            AuthServiceError::Validation("enter a valid phone number or email".into())
        })?;

        // 2. Lookup: dedicated column first, combined OR query as fallback
        let account = self.find_account(&identifier).await?;

        // 3. Admin bypass identities always authenticate with a password,
        //    even before their account row exists
        if self.is_admin_identifier(&identifier) {
            return Ok(InitiateOutcome::HasPassword);
        }

        let Some(account) = account else {
            return self.handle_unknown(&identifier, input.invite_code).await;
        };

        // 4. Blocking statuses win over the password short-circuit; a
        //    pending account with a password waits on approval, not a login
        if let Some(status) = account.blocking_status() {
            return Ok(InitiateOutcome::Blocked { status });
        }

        // 5. Password short-circuit
        if account.password_hash.is_some() {
            return Ok(InitiateOutcome::HasPassword);
        }

        // 6. Code delivery
        let channel = self.send_challenge(&account, &identifier).await?;
        Ok(InitiateOutcome::CodeSent { channel })
    }

    async fn find_account(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Account>, AuthServiceError> {
        let found = match identifier {
            Identifier::Email(email) => self.accounts.find_by_email(email).await?,
            Identifier::Phone(phone) => self.accounts.find_by_phone(phone).await?,
        };
        if found.is_some() {
            return Ok(found);
        }
        self.accounts.find_by_identifier(identifier.as_str()).await
    }

    fn is_admin_identifier(&self, identifier: &Identifier) -> bool {
        match identifier {
            Identifier::Email(email) => {
                !self.admin_email.is_empty() && email.eq_ignore_ascii_case(&self.admin_email)
            }
            Identifier::Phone(phone) => {
                !self.admin_phone.is_empty() && phone == &self.admin_phone
            }
        }
    }

    /// Unknown identity: run the authorization gate. Authorized identities
    /// get a placeholder account and a code; everyone else gets exactly one
    /// pending access request.
    async fn handle_unknown(
        &self,
        identifier: &Identifier,
        invite_code: Option<String>,
    ) -> Result<InitiateOutcome, AuthServiceError> {
        if self.is_authorized(identifier, invite_code).await? {
            let account = self.create_placeholder(identifier).await?;
            let channel = self.send_challenge(&account, identifier).await?;
            return Ok(InitiateOutcome::CodeSent { channel });
        }

        if self
            .authorizations
            .find_pending_request(identifier.as_str())
            .await?
            .is_some()
        {
            return Ok(InitiateOutcome::Blocked {
                status: AuthStatus::Pending,
            });
        }

        let now = Utc::now();
        self.authorizations
            .create(&AuthorizationEntry {
                id: Uuid::new_v4(),
                email: match identifier {
                    Identifier::Email(e) => Some(e.clone()),
                    Identifier::Phone(_) => None,
                },
                phone_number: match identifier {
                    Identifier::Phone(p) => Some(p.clone()),
                    Identifier::Email(_) => None,
                },
                email_domain: None,
                invite_code: None,
                status: AuthorizationStatus::Pending,
                max_uses: None,
                used_count: 0,
                expires_at: None,
                created_by: None,
                note: None,
                created_at: now,
                updated_at: now,
            })
            .await?;

        Ok(InitiateOutcome::Blocked {
            status: AuthStatus::Unauthorized,
        })
    }

    async fn is_authorized(
        &self,
        identifier: &Identifier,
        invite_code: Option<String>,
    ) -> Result<bool, AuthServiceError> {
        let allowed = match identifier {
            Identifier::Email(email) => {
                self.authorizations.find_active_for_email(email).await?
            }
            Identifier::Phone(phone) => {
                self.authorizations.find_active_for_phone(phone).await?
            }
        };
        if allowed.is_some() {
            return Ok(true);
        }

        let Some(code) = invite_code else {
            return Ok(false);
        };
        let Some(invite) = self.authorizations.find_invite(&code).await? else {
            return Ok(false);
        };
        if !invite.invite_usable(Utc::now()) {
            return Ok(false);
        }
        self.authorizations.consume_invite(invite.id).await?;
        Ok(true)
    }

    async fn create_placeholder(
        &self,
        identifier: &Identifier,
    ) -> Result<Account, AuthServiceError> {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            phone_number: match identifier {
                Identifier::Phone(p) => Some(p.clone()),
                Identifier::Email(_) => None,
            },
            email: match identifier {
                Identifier::Email(e) => Some(e.clone()),
                Identifier::Phone(_) => None,
            },
            first_name: String::new(),
            last_name: String::new(),
            tax_id: None,
            role: UserRole::User,
            position: None,
            department: None,
            active: true,
            status: AccountStatus::Active,
            password_hash: None,
            email_verified: false,
            failed_login_attempts: 0,
            lock_until: None,
            modules: ModulePermissions::for_role(UserRole::User),
            protocol: None,
            created_at: now,
            updated_at: now,
        };
        self.accounts.create(&account).await?;
        self.events
            .record(Some(account.id), AccessAction::Created, None)
            .await?;
        Ok(account)
    }

    /// Pick the channel (email preferred when an email was submitted and the
    /// account has one), write the challenge and deliver the code.
    async fn send_challenge(
        &self,
        account: &Account,
        identifier: &Identifier,
    ) -> Result<DeliveryChannel, AuthServiceError> {
        let (channel, recipient) = match (identifier, &account.email, &account.phone_number) {
            (Identifier::Email(_), Some(email), _) => (DeliveryChannel::Email, email.clone()),
            (_, _, Some(phone)) => (DeliveryChannel::Sms, phone.clone()),
            (_, Some(email), None) => (DeliveryChannel::Email, email.clone()),
            (_, None, None) => {
                return Err(AuthServiceError::Internal(anyhow::anyhow!(
                    "account {} has no deliverable identity",
                    account.id
                )));
            }
        };

        let code = generate_code();
        let now = Utc::now();
        self.challenges
            .put(&VerificationChallenge {
                id: Uuid::new_v4(),
                account_id: account.id,
                channel,
                code: code.clone(),
                expires_at: now + Duration::minutes(self.code_ttl_minutes),
                created_at: now,
            })
            .await?;

        self.delivery.send_code(channel, &recipient, &code).await?;
        Ok(channel)
    }
}
