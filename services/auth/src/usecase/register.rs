use ancora_domain::contract::{DeliveryChannel, RegisterOutcome};
use ancora_domain::identifier;
use ancora_domain::pagination::PageRequest;
use ancora_domain::user::{AccountStatus, ModulePermissions, UserRole};
use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{
    AccessEventRepository, AccountRepository, AuthorizationRepository, ChallengeRepository,
    CodeDeliveryPort, CreateIdentityOutcome, IdentityProviderPort, ProviderIdentity,
};
use crate::domain::types::{AccessAction, Account, VerificationChallenge};
use crate::error::AuthServiceError;
use crate::usecase::initiate::generate_code;
use crate::usecase::password::{MIN_PASSWORD_LEN, hash_password};

pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub tax_id: String,
    pub password: String,
    pub invite_code: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
}

pub struct QuickRegisterUseCase<A, Z, C, D, E, P>
where
    A: AccountRepository,
    Z: AuthorizationRepository,
    C: ChallengeRepository,
    D: CodeDeliveryPort,
    E: AccessEventRepository,
    P: IdentityProviderPort,
{
    pub accounts: A,
    pub authorizations: Z,
    pub challenges: C,
    pub delivery: D,
    pub events: E,
    pub provider: P,
    pub code_ttl_minutes: i64,
}

impl<A, Z, C, D, E, P> QuickRegisterUseCase<A, Z, C, D, E, P>
where
    A: AccountRepository,
    Z: AuthorizationRepository,
    C: ChallengeRepository,
    D: CodeDeliveryPort,
    E: AccessEventRepository,
    P: IdentityProviderPort,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<RegisterOutcome, AuthServiceError> {
        // 1. Re-validate everything the form promised
        let input = validate_input(input)?;

        // 2. Authorization gate, invite first
        let invite = match &input.invite_code {
            Some(code) => {
                let invite = self
                    .authorizations
                    .find_invite(code)
                    .await?
                    .filter(|invite| invite.invite_usable(Utc::now()))
                    .ok_or(AuthServiceError::NotAuthorized)?;
                Some(invite)
            }
            None => {
                let allowed = self
                    .authorizations
                    .find_active_for_email(&input.email)
                    .await?
                    .is_some()
                    || self
                        .authorizations
                        .find_active_for_phone(&input.phone)
                        .await?
                        .is_some();
                if !allowed {
                    return Err(AuthServiceError::NotAuthorized);
                }
                None
            }
        };

        // 3. Create the identity at the provider; a colliding email goes
        //    through reconciliation instead of failing outright
        match self
            .provider
            .create_identity(&input.email, &input.password)
            .await?
        {
            CreateIdentityOutcome::Created(identity) => {
                let account = self.build_account(&input, identity.id)?;
                self.accounts.create(&account).await?;
                if let Some(invite) = invite {
                    self.authorizations.consume_invite(invite.id).await?;
                }
                self.events
                    .record(Some(account.id), AccessAction::Registered, None)
                    .await?;
                self.send_email_challenge(&account).await?;
                Ok(RegisterOutcome::Registered {
                    channel: DeliveryChannel::Email,
                })
            }
            CreateIdentityOutcome::EmailExists => self.reconcile(&input).await,
        }
    }

    /// The provider holds this email already. Three cases:
    /// unverified local row → resend the challenge; verified local row →
    /// conflict; no local row → the identity is orphaned at the provider and
    /// gets a local row keyed by the provider id.
    async fn reconcile(&self, input: &ValidRegisterInput) -> Result<RegisterOutcome, AuthServiceError> {
        if let Some(existing) = self.accounts.find_by_email(&input.email).await? {
            if existing.email_verified {
                return Err(AuthServiceError::RegistrationConflict);
            }
            self.send_email_challenge(&existing).await?;
            return Ok(RegisterOutcome::VerificationResent {
                channel: DeliveryChannel::Email,
            });
        }

        let Some(identity) = self.find_provider_identity(&input.email).await? else {
            // Provider said the email exists but will not list it.
            return Err(AuthServiceError::RegistrationConflict);
        };

        // Keyed by the provider id, so running this twice converges on one
        // row. Email ownership is re-proven by the challenge before the
        // account can log in.
        let account = self.build_account(input, identity.id)?;
        self.accounts.upsert(&account).await?;
        self.events
            .record(
                Some(account.id),
                AccessAction::Reconciled,
                Some("orphaned provider identity"),
            )
            .await?;
        self.send_email_challenge(&account).await?;
        Ok(RegisterOutcome::Registered {
            channel: DeliveryChannel::Email,
        })
    }

    async fn find_provider_identity(
        &self,
        email: &str,
    ) -> Result<Option<ProviderIdentity>, AuthServiceError> {
        let mut page = PageRequest::default();
        loop {
            let identities = self.provider.list_identities(page).await?;
            if identities.is_empty() {
                return Ok(None);
            }
            if let Some(found) = identities
                .into_iter()
                .find(|identity| identity.email.eq_ignore_ascii_case(email))
            {
                return Ok(Some(found));
            }
            page = page.next();
        }
    }

    fn build_account(
        &self,
        input: &ValidRegisterInput,
        id: Uuid,
    ) -> Result<Account, AuthServiceError> {
        let now = Utc::now();
        Ok(Account {
            id,
            phone_number: Some(input.phone.clone()),
            email: Some(input.email.clone()),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            tax_id: Some(input.tax_id.clone()),
            role: UserRole::User,
            position: input.position.clone(),
            department: input.department.clone(),
            active: true,
            status: AccountStatus::Pending,
            password_hash: Some(hash_password(&input.password)?),
            email_verified: false,
            failed_login_attempts: 0,
            lock_until: None,
            modules: ModulePermissions::for_role(UserRole::User),
            protocol: Some(generate_protocol(now)),
            created_at: now,
            updated_at: now,
        })
    }

    async fn send_email_challenge(&self, account: &Account) -> Result<(), AuthServiceError> {
        let email = account.email.as_deref().ok_or_else(|| {
            AuthServiceError::Internal(anyhow::anyhow!("account {} has no email", account.id))
        })?;
        let code = generate_code();
        let now = Utc::now();
        self.challenges
            .put(&VerificationChallenge {
                id: Uuid::new_v4(),
                account_id: account.id,
                channel: DeliveryChannel::Email,
                code: code.clone(),
                expires_at: now + Duration::minutes(self.code_ttl_minutes),
                created_at: now,
            })
            .await?;
        self.delivery
            .send_code(DeliveryChannel::Email, email, &code)
            .await
    }
}

struct ValidRegisterInput {
    first_name: String,
    last_name: String,
    phone: String,
    email: String,
    tax_id: String,
    password: String,
    invite_code: Option<String>,
    position: Option<String>,
    department: Option<String>,
}

fn validate_input(input: RegisterInput) -> Result<ValidRegisterInput, AuthServiceError> {
    let first_name = input.first_name.trim().to_string();
    let last_name = input.last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AuthServiceError::Validation(
            "first and last name are required".into(),
        ));
    }

    let phone = identifier::normalize_phone(&input.phone);
    if !identifier::is_valid_phone(&phone) {
        return Err(AuthServiceError::Validation(
            "enter a valid phone number".into(),
        ));
    }

    let email = input.email.trim().to_ascii_lowercase();
    if !identifier::is_valid_email(&email) {
        return Err(AuthServiceError::Validation("enter a valid email".into()));
    }

    if !identifier::is_valid_tax_id(&input.tax_id) {
        return Err(AuthServiceError::Validation(
            "enter a valid tax id (11 digits)".into(),
        ));
    }

    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthServiceError::Validation(format!(
            "password must have at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok(ValidRegisterInput {
        first_name,
        last_name,
        phone,
        email,
        tax_id: input
            .tax_id
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect(),
        password: input.password,
        invite_code: input
            .invite_code
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty()),
        position: input.position,
        department: input.department,
    })
}

/// Registration protocol number shown to the user on the pending screen.
fn generate_protocol(now: chrono::DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    format!("{}-{:06}", now.format("%Y%m%d"), rng.random_range(0..1_000_000u32))
}
