//! Sign Up Use Case
//!
//! Creates an account and opens its first session.

use std::sync::Arc;

use crate::application::access_token::AccessTokenCodec;
use crate::application::account_resolver::AccountResolver;
use crate::application::config::AuthConfig;
use crate::application::token_issuer::{TokenIssuer, TokenPair};
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::error::AuthResult;

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

/// Sign up output
pub struct SignUpOutput {
    pub account: Account,
    pub tokens: TokenPair,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: AccountRepository,
{
    resolver: AccountResolver<R>,
    issuer: TokenIssuer<R>,
}

impl<R> SignUpUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, codec: Arc<AccessTokenCodec>) -> Self {
        Self {
            resolver: AccountResolver::new(repo.clone(), config.clone()),
            issuer: TokenIssuer::new(repo, config, codec),
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let account = self
            .resolver
            .create_account(&input.email, input.password)
            .await?;
        let tokens = self.issuer.issue_pair(&account).await?;

        tracing::info!(account_id = %account.account_id, "Account signed up");

        Ok(SignUpOutput { account, tokens })
    }
}
