//! Sign Out Use Case
//!
//! Revokes one session. Other devices stay signed in.

use std::sync::Arc;

use platform::crypto::token_fingerprint;

use crate::application::config::AuthConfig;
use crate::application::deadline::with_deadline;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::AccountId;
use crate::error::{AuthError, AuthResult, SessionMiss};

/// Sign out use case
pub struct SignOutUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignOutUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, account_id: &AccountId, refresh_token: &str) -> AuthResult<()> {
        let removed = with_deadline(
            self.config.store_timeout,
            "remove_session",
            self.repo.remove_session(account_id, refresh_token),
        )
        .await?;

        // Lost a race with another revoke or eviction
        if !removed {
            return Err(AuthError::SessionNotFound(SessionMiss::NoMatchingSession));
        }

        tracing::info!(
            account_id = %account_id,
            session = %token_fingerprint(refresh_token),
            "Session revoked"
        );

        Ok(())
    }
}
