//! Token Issuer
//!
//! Refresh tokens are sessions appended to the account; access tokens are
//! signed and never stored.

use std::sync::Arc;

use chrono::Utc;

use crate::application::access_token::AccessTokenCodec;
use crate::application::config::AuthConfig;
use crate::application::deadline::with_deadline;
use crate::domain::entity::{IssuesTokens, Session};
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

/// Both tokens handed out on signup and login
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct TokenIssuer<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    codec: Arc<AccessTokenCodec>,
}

impl<R> TokenIssuer<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, codec: Arc<AccessTokenCodec>) -> Self {
        Self {
            repo,
            config,
            codec,
        }
    }

    /// Open a new session for `account` and return its refresh token.
    ///
    /// Every call adds an independent session; concurrent calls all persist.
    pub async fn create_session<A: IssuesTokens>(&self, account: &A) -> AuthResult<String> {
        let account_id = account.token_subject();
        let session = Session::issue(self.config.refresh_ttl_chrono(), Utc::now())
            .ok_or_else(|| AuthError::Internal("refresh session expiry is out of range".to_string()))?;

        let stored = with_deadline(
            self.config.store_timeout,
            "push_session",
            self.repo
                .push_session(&account_id, &session, self.config.max_sessions),
        )
        .await?;

        if !stored {
            return Err(AuthError::Internal(format!(
                "account {} vanished while opening a session",
                account_id
            )));
        }

        tracing::debug!(
            account_id = %account_id,
            session = %session.fingerprint(),
            expires_at = %session.expires_at,
            "Session created"
        );

        Ok(session.token)
    }

    /// Sign a fresh access token. Does not touch the store.
    pub fn generate_access_token<A: IssuesTokens>(&self, account: &A) -> AuthResult<String> {
        self.codec.issue(account)
    }

    pub async fn issue_pair<A: IssuesTokens>(&self, account: &A) -> AuthResult<TokenPair> {
        let refresh_token = self.create_session(account).await?;
        let access_token = self.generate_access_token(account)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}
