//! Shared-secret admin session.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::{Result, RuntimeError};
use crate::repository::{CacheKey, CacheStore};

/// The persisted session marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub logged_in: bool,
    /// Login time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

/// Checks the admin secret and tracks the session's lifetime.
///
/// Sessions expire a fixed time after login and are never renewed.
pub struct AdminGate {
    secret: String,
    ttl: Duration,
    cache: CacheStore,
    session: Option<AdminSession>,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>, ttl: Duration, cache: CacheStore) -> Self {
        Self {
            secret: secret.into(),
            ttl,
            cache,
            session: None,
        }
    }

    /// Picks up a persisted session. Expired markers are deleted.
    pub fn restore(&mut self) -> bool {
        self.session = self
            .cache
            .get::<AdminSession>(CacheKey::AdminSession)
            .filter(|session| session.logged_in);
        self.is_active()
    }

    pub fn login(&mut self, attempt: &str) -> Result<()> {
        if attempt != self.secret {
            return Err(RuntimeError::InvalidSecret);
        }
        let session = AdminSession {
            logged_in: true,
            timestamp: self.cache.now_millis(),
        };
        self.cache.set(CacheKey::AdminSession, &session);
        self.session = Some(session);
        info!("Admin session started");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.session = None;
        self.cache.remove(CacheKey::AdminSession);
        info!("Admin session ended");
    }

    /// True while a session exists and has not expired. Expired sessions are
    /// discarded as a side effect.
    pub fn is_active(&mut self) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        let ttl = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        if self.cache.now_millis().saturating_sub(session.timestamp) < ttl {
            return true;
        }

        debug!("Discarding expired admin session");
        self.session = None;
        self.cache.remove(CacheKey::AdminSession);
        false
    }

    pub fn require(&mut self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(RuntimeError::NotAuthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::repository::{InMemoryStorage, ManualClock};

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn gate() -> (AdminGate, CacheStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(10_000));
        let cache = CacheStore::new(Arc::new(InMemoryStorage::new()), clock.clone());
        (AdminGate::new("hunter2", DAY, cache.clone()), cache, clock)
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let (mut gate, cache, _) = gate();
        assert!(matches!(gate.login("nope"), Err(RuntimeError::InvalidSecret)));
        assert!(!gate.is_active());
        assert!(cache.get::<AdminSession>(CacheKey::AdminSession).is_none());
    }

    #[test]
    fn test_session_survives_restore_until_expiry() {
        let (mut gate, cache, clock) = gate();
        gate.login("hunter2").unwrap();

        let mut restored = AdminGate::new("hunter2", DAY, cache.clone());
        clock.advance(DAY - Duration::from_millis(1));
        assert!(restored.restore());

        clock.advance(Duration::from_millis(1));
        assert!(!restored.restore());
        assert!(cache.get::<AdminSession>(CacheKey::AdminSession).is_none());
        assert!(matches!(restored.require(), Err(RuntimeError::NotAuthenticated)));
    }

    #[test]
    fn test_logout_removes_marker() {
        let (mut gate, cache, _) = gate();
        gate.login("hunter2").unwrap();
        gate.logout();
        assert!(gate.require().is_err());
        assert!(cache.get::<AdminSession>(CacheKey::AdminSession).is_none());
    }

    #[test]
    fn test_logged_out_marker_is_ignored() {
        let (mut gate, cache, _) = gate();
        cache.set(
            CacheKey::AdminSession,
            &AdminSession {
                logged_in: false,
                timestamp: 10_000,
            },
        );
        assert!(!gate.restore());
    }
}
