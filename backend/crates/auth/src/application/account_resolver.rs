//! Account Resolver
//!
//! Creates accounts and resolves them by credentials or by id. Argon2 work
//! runs on the blocking pool.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::deadline::with_deadline;
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountId, Email, RawSecret, SecretHash};
use crate::error::{AuthError, AuthResult};

pub struct AccountResolver<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> AccountResolver<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Validate, hash and insert. A taken email fails with `DuplicateEmail`.
    pub async fn create_account(&self, email: &str, secret: String) -> AuthResult<Account> {
        let email = Email::new(email)?;
        let raw = RawSecret::new(secret)?;

        let secret_hash = tokio::task::spawn_blocking(move || raw.hash())
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {}", e)))??;

        let account = Account::new(email, secret_hash);
        with_deadline(
            self.config.store_timeout,
            "create_account",
            self.repo.create(&account),
        )
        .await?;

        Ok(account)
    }

    /// Any miss, malformed input or wrong secret is `InvalidCredentials`.
    ///
    /// An unknown email still pays for one Argon2 verification.
    pub async fn find_by_credentials(&self, email: &str, secret: String) -> AuthResult<Account> {
        let raw = RawSecret::for_login(secret).map_err(|_| AuthError::InvalidCredentials)?;
        let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;

        let found = with_deadline(
            self.config.store_timeout,
            "find_by_email",
            self.repo.find_by_email(&email),
        )
        .await?;

        let (account, verified) = match found {
            Some(account) => {
                let hash = account.secret_hash.clone();
                let verified = run_blocking(move || hash.verify(&raw)).await?;
                (Some(account), verified)
            }
            None => {
                let verified = run_blocking(move || SecretHash::verify_dummy(&raw)).await?;
                (None, verified)
            }
        };

        match account {
            Some(account) if verified => Ok(account),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        with_deadline(
            self.config.store_timeout,
            "find_by_id",
            self.repo.find_by_id(account_id),
        )
        .await
    }
}

async fn run_blocking<F>(f: F) -> AuthResult<bool>
where
    F: FnOnce() -> bool + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(format!("verification task failed: {}", e)))
}
