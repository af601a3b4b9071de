//! Session Entity
//!
//! One logged-in device. Holds an opaque refresh token and an absolute
//! expiry; never mutated after creation.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use platform::crypto::{constant_time_eq, random_opaque_token, token_fingerprint};

/// Refresh-token session embedded in an account
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque refresh token (base64url, 256 bits)
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Fresh session with a new random token, valid for `ttl` from `now`.
    /// `None` if the expiry is not a representable timestamp.
    pub fn issue(ttl: Duration, now: DateTime<Utc>) -> Option<Self> {
        Some(Self {
            token: random_opaque_token(),
            expires_at: now.checked_add_signed(ttl)?,
            created_at: now,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.expires_at, now)
    }

    /// Constant-time token comparison
    pub fn matches(&self, token: &str) -> bool {
        constant_time_eq(self.token.as_bytes(), token.as_bytes())
    }

    /// Log-safe tag for the token
    pub fn fingerprint(&self) -> String {
        token_fingerprint(&self.token)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.fingerprint())
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Fail-closed: a session checked at exactly `expires_at` is expired.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expires_at
}

/// Outcome of looking a refresh token up in a session list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    NotFound,
    Expired(Session),
    Valid(Session),
}

/// First session whose token matches, classified against `now`.
pub fn lookup(sessions: &[Session], token: &str, now: DateTime<Utc>) -> SessionLookup {
    match sessions.iter().find(|s| s.matches(token)) {
        None => SessionLookup::NotFound,
        Some(s) if s.is_expired(now) => SessionLookup::Expired(s.clone()),
        Some(s) => SessionLookup::Valid(s.clone()),
    }
}

/// Drop the oldest sessions until at most `max` remain. Returns the evicted.
///
/// `sessions` is kept in creation order, so the oldest are at the front.
pub fn enforce_capacity(sessions: &mut Vec<Session>, max: usize) -> Vec<Session> {
    let max = max.max(1);
    if sessions.len() <= max {
        return Vec::new();
    }
    let excess = sessions.len() - max;
    sessions.drain(..excess).collect()
}

/// Sessions held after appending one to `existing` under a cap of `max`.
pub fn count_after_append(existing: usize, max: usize) -> usize {
    (existing + 1).min(max.max(1))
}
