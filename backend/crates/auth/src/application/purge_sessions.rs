//! Expired Session Purge

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::deadline::with_deadline;
use crate::domain::repository::AccountRepository;
use crate::error::AuthResult;

/// Deletes sessions that can never be used again
pub struct PurgeExpiredSessionsUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> PurgeExpiredSessionsUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self) -> AuthResult<u64> {
        let deleted = with_deadline(
            self.config.store_timeout,
            "purge_expired_sessions",
            self.repo.purge_expired_sessions(Utc::now()),
        )
        .await?;

        tracing::info!(sessions_deleted = deleted, "Purged expired sessions");

        Ok(deleted)
    }
}
