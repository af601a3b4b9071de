//! Check Session Use Case
//!
//! Resolves `(account id, refresh token)` to an account holding a live
//! session. Backs the session middleware.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::account_resolver::AccountResolver;
use crate::application::config::AuthConfig;
use crate::domain::entity::{Account, HasSessions, SessionLookup};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::AccountId;
use crate::error::{AuthError, AuthResult, SessionMiss};

/// Check session use case
pub struct CheckSessionUseCase<R>
where
    R: AccountRepository,
{
    resolver: AccountResolver<R>,
}

impl<R> CheckSessionUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            resolver: AccountResolver::new(repo, config),
        }
    }

    pub async fn execute(&self, account_id: &str, refresh_token: &str) -> AuthResult<Account> {
        self.execute_at(account_id, refresh_token, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        account_id: &str,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Account> {
        // An id that cannot exist is reported like one that does not
        let account_id: AccountId = account_id
            .parse()
            .map_err(|_| AuthError::SessionNotFound(SessionMiss::MalformedAccountId))?;

        let account = self
            .resolver
            .find_by_id(&account_id)
            .await?
            .ok_or(AuthError::SessionNotFound(SessionMiss::UnknownAccount))?;

        match account.find_session(refresh_token, now) {
            SessionLookup::Valid(_) => Ok(account),
            SessionLookup::Expired(session) => {
                tracing::warn!(
                    account_id = %account_id,
                    session = %session.fingerprint(),
                    expired_at = %session.expires_at,
                    "Refresh session expired"
                );
                Err(AuthError::SessionExpired)
            }
            SessionLookup::NotFound => Err(AuthError::SessionNotFound(SessionMiss::NoMatchingSession)),
        }
    }
}
