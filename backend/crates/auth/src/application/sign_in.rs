//! Sign In Use Case
//!
//! Verifies credentials and opens a new session alongside any existing ones.

use std::sync::Arc;

use crate::application::access_token::AccessTokenCodec;
use crate::application::account_resolver::AccountResolver;
use crate::application::config::AuthConfig;
use crate::application::token_issuer::{TokenIssuer, TokenPair};
use crate::domain::entity::{Account, session};
use crate::domain::repository::AccountRepository;
use crate::error::AuthResult;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub account: Account,
    pub tokens: TokenPair,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: AccountRepository,
{
    resolver: AccountResolver<R>,
    issuer: TokenIssuer<R>,
    max_sessions: usize,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, codec: Arc<AccessTokenCodec>) -> Self {
        Self {
            resolver: AccountResolver::new(repo.clone(), config.clone()),
            max_sessions: config.max_sessions,
            issuer: TokenIssuer::new(repo, config, codec),
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let account = self
            .resolver
            .find_by_credentials(&input.email, input.password)
            .await?;
        let tokens = self.issuer.issue_pair(&account).await?;

        tracing::info!(
            account_id = %account.account_id,
            active_sessions = session::count_after_append(account.sessions.len(), self.max_sessions),
            "Account signed in"
        );

        Ok(SignInOutput { account, tokens })
    }
}
