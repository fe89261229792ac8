//! Login step state machine.
//!
//! Steps only change in response to explicit submissions; timers, focus
//! changes and background refreshes never move the flow. Outcomes the
//! controller does not recognize never reach it; strict contract
//! deserialization upstream turns them into [`LoginController::fail`].

use ancora_domain::contract::{
    AuthStatus, DeliveryChannel, InitiateOutcome, ProfileSnapshot, RegisterOutcome,
    SessionOutcome,
};
use ancora_domain::identifier::Identifier;
use serde::{Deserialize, Serialize};

use crate::session::SessionSnapshot;

/// The screen the flow is currently on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum LoginStep {
    /// Identifier entry (phone or email).
    Phone,
    /// Six-digit code entry; the identifier and delivery channel are shown.
    Verification {
        identifier: Identifier,
        channel: DeliveryChannel,
    },
    /// Password entry for accounts that have one.
    Password { identifier: Identifier },
    /// Abbreviated registration form, prefilled from the identifier.
    QuickRegister {
        status: AuthStatus,
        identifier: Option<Identifier>,
    },
    /// Authenticated but the account has no password yet; one must be set
    /// before the flow completes.
    SetPassword,
    /// Blocking screen: account awaiting approval.
    Pending,
    /// Blocking screen: access denied. Also hosts `inactive`, which renders
    /// here with its own copy.
    Unauthorized { status: AuthStatus },
    /// Authenticated with a persisted session.
    Complete,
}

/// Inline notice shown on the current form without changing steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowNotice {
    /// Network failure, server error, or a payload outside the contract.
    RequestFailed,
    /// Wrong or expired verification code.
    InvalidCode,
    /// Wrong password.
    InvalidCredentials,
}

/// Reducer over the wire contract. Holds the current step plus at most one
/// inline notice; all session persistence happens outside, driven by the
/// snapshots the transition methods return.
#[derive(Debug)]
pub struct LoginController {
    step: LoginStep,
    notice: Option<FlowNotice>,
}

impl Default for LoginController {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginController {
    pub fn new() -> Self {
        Self {
            step: LoginStep::Phone,
            notice: None,
        }
    }

    /// Resume from a previously persisted session.
    pub fn resumed() -> Self {
        Self {
            step: LoginStep::Complete,
            notice: None,
        }
    }

    pub fn step(&self) -> &LoginStep {
        &self.step
    }

    pub fn notice(&self) -> Option<FlowNotice> {
        self.notice
    }

    /// A request failed in a way the contract does not describe. The current
    /// form is re-presented with a generic notice.
    pub fn fail(&mut self, notice: FlowNotice) {
        self.notice = Some(notice);
    }

    /// Apply the outcome of the identifier submission.
    pub fn on_initiate(&mut self, identifier: Identifier, outcome: InitiateOutcome) {
        self.notice = None;
        self.step = match outcome {
            InitiateOutcome::HasPassword => LoginStep::Password { identifier },
            InitiateOutcome::CodeSent { channel } => LoginStep::Verification {
                identifier,
                channel,
            },
            InitiateOutcome::Blocked { status } => blocked_step(status, Some(identifier)),
        };
    }

    /// Apply the outcome of the quick-register submission. Either outcome
    /// leaves a password on the account, so the flow proceeds straight to an
    /// automatic login attempt with it; the caller feeds that result to
    /// [`Self::on_authenticated`], or to [`Self::on_register_login_failed`]
    /// when the attempt errors out.
    pub fn on_register(&mut self, identifier: Identifier, outcome: RegisterOutcome) {
        self.notice = None;
        match outcome {
            RegisterOutcome::Registered { .. } | RegisterOutcome::VerificationResent { .. } => {
                self.step = LoginStep::Password { identifier };
            }
        }
    }

    /// The automatic login after registration did not go through; start over
    /// from the identifier step.
    pub fn on_register_login_failed(&mut self) {
        self.step = LoginStep::Phone;
        self.notice = Some(FlowNotice::RequestFailed);
    }

    /// Apply the outcome of a code or password submission. Returns the
    /// session snapshot to persist when authentication succeeded.
    pub fn on_authenticated(
        &mut self,
        outcome: SessionOutcome,
        remember: bool,
    ) -> Option<SessionSnapshot> {
        self.notice = None;
        match outcome {
            SessionOutcome::Authenticated {
                token,
                requires_password,
                profile,
            } => {
                self.step = if requires_password {
                    LoginStep::SetPassword
                } else {
                    LoginStep::Complete
                };
                Some(SessionSnapshot {
                    token,
                    remember,
                    profile,
                })
            }
            SessionOutcome::Blocked { status } => {
                self.step = blocked_step(status, current_identifier(&self.step));
                None
            }
        }
    }

    /// The forced password set after a code login succeeded.
    pub fn on_password_set(&mut self) {
        if self.step == LoginStep::SetPassword {
            self.notice = None;
            self.step = LoginStep::Complete;
        }
    }

    /// Local credentials were purged (logout or dead session).
    pub fn on_session_ended(&mut self) {
        self.step = LoginStep::Phone;
        self.notice = None;
    }

    /// Minimal profile for rendering while on [`LoginStep::Complete`].
    pub fn greeting(profile: &ProfileSnapshot) -> String {
        format!("{} {}", profile.first_name, profile.last_name)
    }
}

fn blocked_step(status: AuthStatus, identifier: Option<Identifier>) -> LoginStep {
    if status.needs_registration() {
        return LoginStep::QuickRegister { status, identifier };
    }
    match status {
        AuthStatus::Pending => LoginStep::Pending,
        // `inactive` shares the unauthorized screen.
        _ => LoginStep::Unauthorized { status },
    }
}

fn current_identifier(step: &LoginStep) -> Option<Identifier> {
    match step {
        LoginStep::Verification { identifier, .. } | LoginStep::Password { identifier } => {
            Some(identifier.clone())
        }
        _ => None,
    }
}
