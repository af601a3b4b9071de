//! PostgreSQL Repository Implementation
//!
//! Sessions live in `account_sessions`, one row per session, so appending is
//! an insert rather than a rewrite of the account's session list.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{Account, Session};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountId, Email, SecretHash};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_sessions(&self, account_id: Uuid) -> AuthResult<Vec<Session>> {
        let rows = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT token, expires_at, created_at
            FROM account_sessions
            WHERE account_id = $1
            ORDER BY session_seq
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SessionRow::into_session).collect())
    }

    async fn with_sessions(&self, row: Option<AccountRow>) -> AuthResult<Option<Account>> {
        match row {
            None => Ok(None),
            Some(row) => {
                let sessions = self.load_sessions(row.account_id).await?;
                row.into_account(sessions).map(Some)
            }
        }
    }
}

impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (account_id, email, secret_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.account_id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.secret_hash.as_phc_string())
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT account_id, email, secret_hash, created_at, updated_at
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        self.with_sessions(row).await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT account_id, email, secret_hash, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        self.with_sessions(row).await
    }

    async fn push_session(
        &self,
        account_id: &AccountId,
        session: &Session,
        max_sessions: usize,
    ) -> AuthResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Serializes appends per account so the cap holds under concurrency.
        // Inserts from every caller still land.
        let exists = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM accounts WHERE account_id = $1 FOR UPDATE",
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        if exists.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO account_sessions (account_id, token, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(&session.token)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&mut *tx)
        .await?;

        let evicted = sqlx::query(
            r#"
            DELETE FROM account_sessions
            WHERE session_seq IN (
                SELECT session_seq
                FROM account_sessions
                WHERE account_id = $1
                ORDER BY session_seq DESC
                OFFSET $2
            )
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(max_sessions.max(1) as i64)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if evicted > 0 {
            tracing::debug!(account_id = %account_id, evicted, "Evicted oldest sessions");
        }

        Ok(true)
    }

    async fn remove_session(&self, account_id: &AccountId, token: &str) -> AuthResult<bool> {
        let deleted = sqlx::query(
            "DELETE FROM account_sessions WHERE account_id = $1 AND token = $2",
        )
        .bind(account_id.as_uuid())
        .bind(token)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted > 0)
    }

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM account_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    email: String,
    secret_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self, sessions: Vec<Session>) -> AuthResult<Account> {
        let secret_hash = SecretHash::from_phc_string(self.secret_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid secret_hash: {}", e)))?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            email: Email::from_db(self.email),
            secret_hash,
            sessions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    token: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            token: self.token,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}
