//! Background session refresh.
//!
//! A persisted session is refreshed on a fixed interval. When refresh fails
//! the driver attempts a repair (signature-only re-issue); when that also
//! fails the session is dead and every local credential is purged.
//!
//! Logout and refresh can race: a refresh that was in flight when the user
//! logged out must not resurrect the purged session. Each tick snapshots a
//! generation counter up front and only commits its result if the counter
//! is unchanged; logout bumps the counter.

#![allow(async_fn_in_trait)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ancora_domain::contract::SessionOutcome;

use crate::session::{self, SessionSnapshot, SessionStore};

/// Fixed refresh cadence.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// The auth service as seen from the client.
pub trait SessionApi: Send + Sync {
    /// `POST /auth/token/refresh` with the current token.
    async fn refresh(&self, token: &str) -> Result<SessionOutcome, ApiError>;
    /// `POST /auth/token/repair`; accepts an expired but signed token.
    async fn repair(&self, token: &str) -> Result<SessionOutcome, ApiError>;
    /// `POST /auth/logout`, best-effort.
    async fn logout(&self, token: &str) -> Result<(), ApiError>;
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// No persisted session.
    Idle,
    Refreshed,
    /// Refresh failed but repair produced a fresh token.
    Repaired,
    /// Both attempts failed; local credentials were purged.
    SessionEnded,
    /// A logout happened while the tick was in flight; nothing was written.
    Superseded,
}

pub struct RefreshDriver<S, A> {
    store: S,
    api: A,
    generation: AtomicU64,
}

impl<S, A> RefreshDriver<S, A>
where
    S: SessionStore,
    A: SessionApi,
{
    pub fn new(store: S, api: A) -> Self {
        Self {
            store,
            api,
            generation: AtomicU64::new(0),
        }
    }

    /// One refresh attempt. Called by [`run`](Self::run); exposed for tests
    /// and for UIs that want to force a refresh on resume.
    pub async fn tick(&self) -> TickResult {
        let generation = self.generation.load(Ordering::SeqCst);
        let Some(current) = session::restore(&self.store) else {
            return TickResult::Idle;
        };

        match self.api.refresh(&current.token).await {
            Ok(SessionOutcome::Authenticated { token, profile, .. }) => {
                return self.commit(
                    generation,
                    SessionSnapshot {
                        token,
                        remember: current.remember,
                        profile,
                    },
                    TickResult::Refreshed,
                );
            }
            Ok(SessionOutcome::Blocked { .. }) => {}
            Err(err) => {
                tracing::debug!(error = %err, "token refresh failed, attempting repair");
            }
        }

        match self.api.repair(&current.token).await {
            Ok(SessionOutcome::Authenticated { token, profile, .. }) => self.commit(
                generation,
                SessionSnapshot {
                    token,
                    remember: current.remember,
                    profile,
                },
                TickResult::Repaired,
            ),
            Ok(SessionOutcome::Blocked { .. }) | Err(_) => {
                if !self.is_current(generation) {
                    return TickResult::Superseded;
                }
                self.store.clear();
                TickResult::SessionEnded
            }
        }
    }

    /// Purge the session and invalidate any in-flight tick, then tell the
    /// server. The server call failing changes nothing locally.
    pub async fn logout(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let token = session::restore(&self.store).map(|s| s.token);
        self.store.clear();
        if let Some(token) = token {
            if let Err(err) = self.api.logout(&token).await {
                tracing::debug!(error = %err, "logout notification failed");
            }
        }
    }

    /// Drive ticks forever until the session ends (dead token or logout).
    /// The caller returns the UI to the identifier step afterwards.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(REFRESH_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match self.tick().await {
                TickResult::SessionEnded => {
                    tracing::info!("session no longer refreshable, credentials purged");
                    return;
                }
                TickResult::Superseded => return,
                TickResult::Repaired => {
                    tracing::info!("session repaired after failed refresh");
                }
                TickResult::Refreshed | TickResult::Idle => {}
            }
        }
    }

    fn commit(&self, generation: u64, snapshot: SessionSnapshot, ok: TickResult) -> TickResult {
        if !self.is_current(generation) {
            return TickResult::Superseded;
        }
        session::persist(&self.store, &snapshot);
        ok
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
