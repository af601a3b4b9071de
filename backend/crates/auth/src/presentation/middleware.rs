//! Auth Middleware
//!
//! `access_auth` verifies an access token without touching the store.
//! `session_auth` verifies a refresh token against the account's sessions
//! and guards only renewal and revocation. Both short-circuit with an
//! `AuthError` before any handler runs.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::application::{AccessTokenCodec, CheckSessionUseCase};
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::AccountId;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";

/// State for `access_auth`: only the codec, no store
#[derive(Debug, Clone)]
pub struct AccessAuthState {
    pub codec: Arc<AccessTokenCodec>,
}

/// Identity attached by `access_auth`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
}

/// Account and refresh token attached by `session_auth`
#[derive(Clone)]
pub struct VerifiedSession {
    pub account: Account,
    pub refresh_token: String,
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Require a valid `x-access-token`.
pub async fn access_auth(
    State(state): State<AccessAuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = header_value(req.headers(), ACCESS_TOKEN_HEADER).ok_or(AuthError::MissingToken)?;
    let claims = state
        .codec
        .verify(token)
        .map_err(AuthError::InvalidOrExpiredToken)?;

    req.extensions_mut().insert(AuthenticatedAccount {
        account_id: claims.account_id,
    });

    Ok(next.run(req).await)
}

/// Require `x-refresh-token` + `x-account-id` naming a live session.
pub async fn session_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let (refresh_token, account_id) = match (
        header_value(req.headers(), REFRESH_TOKEN_HEADER),
        header_value(req.headers(), ACCOUNT_ID_HEADER),
    ) {
        (Some(token), Some(id)) => (token.to_string(), id.to_string()),
        _ => return Err(AuthError::MissingCredentials),
    };

    let account = CheckSessionUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&account_id, &refresh_token)
        .await?;

    req.extensions_mut().insert(VerifiedSession {
        account,
        refresh_token,
    });

    Ok(next.run(req).await)
}

// ============================================================================
// Extractors
// ============================================================================

impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .copied()
            .ok_or(AuthError::MissingToken)
    }
}

impl<S> FromRequestParts<S> for VerifiedSession
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedSession>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}
