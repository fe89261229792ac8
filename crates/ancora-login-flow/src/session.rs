//! Session persistence boundary.
//!
//! All reads and writes of the locally held credential go through
//! [`SessionStore`], so there is exactly one place where serialization can
//! fail. Corrupt or unreadable data is purged, never half-trusted.

use ancora_domain::contract::ProfileSnapshot;
use serde::{Deserialize, Serialize};

/// The credential slice held between requests: the token plus the minimal
/// profile needed to render without a round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub token: String,
    pub remember: bool,
    pub profile: ProfileSnapshot,
}

/// Where the snapshot lives: localStorage in a browser shell, a keyring or
/// file on desktop. Implementations are plain string cells.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, raw: &str);
    fn clear(&self);
}

/// Persist a snapshot through the store.
pub fn persist<S: SessionStore>(store: &S, snapshot: &SessionSnapshot) {
    match serde_json::to_string(snapshot) {
        Ok(raw) => store.save(&raw),
        Err(err) => {
            tracing::warn!(error = %err, "failed to serialize session snapshot");
            store.clear();
        }
    }
}

/// Restore the snapshot, purging anything that does not deserialize.
pub fn restore<S: SessionStore>(store: &S) -> Option<SessionSnapshot> {
    let raw = store.load()?;
    match serde_json::from_str(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(_) => {
            store.clear();
            None
        }
    }
}
