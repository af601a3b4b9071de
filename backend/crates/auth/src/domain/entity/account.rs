//! Account Entity
//!
//! An account owns its sessions. Session behavior is exposed through
//! `HasSessions`; anything that can be the subject of an access token
//! implements `IssuesTokens`.

use chrono::{DateTime, Utc};

use crate::domain::entity::session::{self, Session, SessionLookup};
use crate::domain::value_object::{AccountId, Email, SecretHash};

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    /// Normalized, unique
    pub email: Email,
    pub secret_hash: SecretHash,
    /// Creation order, oldest first
    pub sessions: Vec<Session>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// New account with no sessions
    pub fn new(email: Email, secret_hash: SecretHash) -> Self {
        let now = Utc::now();
        Self {
            account_id: AccountId::new(),
            email,
            secret_hash,
            sessions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Owner of an ordered session list
pub trait HasSessions {
    fn sessions(&self) -> &[Session];

    fn sessions_mut(&mut self) -> &mut Vec<Session>;

    /// Append without deduplication, then evict the oldest beyond
    /// `max_sessions`. Returns the evicted sessions.
    fn add_session(&mut self, new_session: Session, max_sessions: usize) -> Vec<Session> {
        let sessions = self.sessions_mut();
        sessions.push(new_session);
        session::enforce_capacity(sessions, max_sessions)
    }

    fn find_session(&self, token: &str, now: DateTime<Utc>) -> SessionLookup {
        session::lookup(self.sessions(), token, now)
    }

    /// Remove every session holding `token`. True if any was removed.
    fn remove_session(&mut self, token: &str) -> bool {
        let sessions = self.sessions_mut();
        let before = sessions.len();
        sessions.retain(|s| !s.matches(token));
        sessions.len() != before
    }

    fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let sessions = self.sessions_mut();
        let before = sessions.len();
        sessions.retain(|s| !s.is_expired(now));
        before - sessions.len()
    }
}

/// Subject of an access token
pub trait IssuesTokens {
    fn token_subject(&self) -> AccountId;
}

impl HasSessions for Account {
    fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    fn sessions_mut(&mut self) -> &mut Vec<Session> {
        &mut self.sessions
    }
}

impl IssuesTokens for Account {
    fn token_subject(&self) -> AccountId {
        self.account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::RawSecret;
    use chrono::Duration;

    fn account() -> Account {
        let hash = RawSecret::new("hunter12".to_string()).unwrap().hash().unwrap();
        Account::new(Email::new("a@example.com").unwrap(), hash)
    }

    #[test]
    fn test_new_account_has_no_sessions() {
        let acc = account();
        assert!(acc.sessions().is_empty());
        assert_eq!(acc.token_subject(), acc.account_id);
    }

    #[test]
    fn test_sessions_coexist() {
        let mut acc = account();
        let now = Utc::now();
        let a = Session::issue(Duration::minutes(10), now).unwrap();
        let b = Session::issue(Duration::minutes(10), now).unwrap();
        acc.add_session(a.clone(), 10);
        acc.add_session(b.clone(), 10);

        assert_eq!(acc.find_session(&a.token, now), SessionLookup::Valid(a));
        assert_eq!(acc.find_session(&b.token, now), SessionLookup::Valid(b));
    }

    #[test]
    fn test_add_session_respects_cap() {
        let mut acc = account();
        let now = Utc::now();
        let first = Session::issue(Duration::minutes(10), now).unwrap();
        acc.add_session(first.clone(), 2);
        acc.add_session(Session::issue(Duration::minutes(10), now).unwrap(), 2);
        let evicted = acc.add_session(Session::issue(Duration::minutes(10), now).unwrap(), 2);

        assert_eq!(evicted, vec![first.clone()]);
        assert_eq!(acc.sessions().len(), 2);
        assert_eq!(acc.find_session(&first.token, now), SessionLookup::NotFound);
    }

    #[test]
    fn test_remove_and_purge() {
        let mut acc = account();
        let now = Utc::now();
        let stale = Session::issue(Duration::minutes(-1), now).unwrap();
        let live = Session::issue(Duration::minutes(10), now).unwrap();
        acc.add_session(stale, 10);
        acc.add_session(live.clone(), 10);

        assert_eq!(acc.purge_expired(now), 1);
        assert!(acc.remove_session(&live.token));
        assert!(!acc.remove_session(&live.token));
        assert!(acc.sessions().is_empty());
    }
}
