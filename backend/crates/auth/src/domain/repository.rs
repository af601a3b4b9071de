//! Repository Traits
//!
//! Interfaces for account persistence. Implementations are in the
//! infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::{Account, Session};
use crate::domain::value_object::{AccountId, Email};
use crate::error::AuthResult;

/// Account repository trait
///
/// Session mutations are single atomic operations at this boundary; callers
/// never read an account, edit its session list and write it back.
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account. A taken email fails with `DuplicateEmail`.
    async fn create(&self, account: &Account) -> AuthResult<()>;

    /// Find account (with sessions) by ID
    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    /// Find account (with sessions) by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Append a session, evicting the oldest beyond `max_sessions` in the same
    /// operation. Returns false if the account does not exist.
    async fn push_session(
        &self,
        account_id: &AccountId,
        session: &Session,
        max_sessions: usize,
    ) -> AuthResult<bool>;

    /// Remove the session holding `token`. Returns false if none matched.
    async fn remove_session(&self, account_id: &AccountId, token: &str) -> AuthResult<bool>;

    /// Delete every session expired as of `now`, across all accounts
    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}
