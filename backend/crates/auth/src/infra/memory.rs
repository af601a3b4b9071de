//! In-Memory Repository Implementation
//!
//! Single-process store behind a tokio mutex. Used by tests and local runs
//! without a database. Every operation holds the lock for its whole duration,
//! so session appends are atomic.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::entity::{Account, HasSessions, Session};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountId, Email};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
struct InnerState {
    accounts: HashMap<AccountId, Account>,
    by_email: HashMap<String, AccountId>,
}

/// In-memory account repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountRepository {
    state: Arc<Mutex<InnerState>>,
    /// Artificial delay before every call
    latency: Option<Duration>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call, for exercising store deadlines
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub async fn account_count(&self) -> usize {
        self.state.lock().await.accounts.len()
    }
}

impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        self.delay().await;
        let mut state = self.state.lock().await;

        if state.by_email.contains_key(account.email.as_str()) {
            return Err(AuthError::DuplicateEmail);
        }

        state
            .by_email
            .insert(account.email.as_str().to_string(), account.account_id);
        state.accounts.insert(account.account_id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        self.delay().await;
        let state = self.state.lock().await;
        Ok(state.accounts.get(account_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        self.delay().await;
        let state = self.state.lock().await;
        Ok(state
            .by_email
            .get(email.as_str())
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn push_session(
        &self,
        account_id: &AccountId,
        session: &Session,
        max_sessions: usize,
    ) -> AuthResult<bool> {
        self.delay().await;
        let mut state = self.state.lock().await;

        match state.accounts.get_mut(account_id) {
            Some(account) => {
                account.add_session(session.clone(), max_sessions);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_session(&self, account_id: &AccountId, token: &str) -> AuthResult<bool> {
        self.delay().await;
        let mut state = self.state.lock().await;

        Ok(state
            .accounts
            .get_mut(account_id)
            .is_some_and(|account| account.remove_session(token)))
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        self.delay().await;
        let mut state = self.state.lock().await;

        let purged: usize = state
            .accounts
            .values_mut()
            .map(|account| account.purge_expired(now))
            .sum();
        Ok(purged as u64)
    }
}
