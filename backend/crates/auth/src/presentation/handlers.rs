//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AccessTokenCodec, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
    TokenIssuer, TokenPair,
};
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{AccessTokenResponse, AccountResponse, LoginRequest, SignUpRequest};
use crate::presentation::middleware::{
    ACCESS_TOKEN_HEADER, AccessAuthState, REFRESH_TOKEN_HEADER, VerifiedSession,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub codec: Arc<AccessTokenCodec>,
}

impl<R> AuthAppState<R>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let codec = AccessTokenCodec::new(&config);
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            codec: Arc::new(codec),
        }
    }

    /// State for guarding other routers with `access_auth`
    pub fn access_auth_state(&self) -> AccessAuthState {
        AccessAuthState {
            codec: self.codec.clone(),
        }
    }
}

fn with_tokens(tokens: TokenPair, body: AccountResponse) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (ACCESS_TOKEN_HEADER, tokens.access_token),
            (REFRESH_TOKEN_HEADER, tokens.refresh_token),
        ],
        Json(body),
    )
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /accounts
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone(), state.codec.clone());
    let output = use_case
        .execute(SignUpInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(with_tokens(output.tokens, AccountResponse::from(&output.account)))
}

// ============================================================================
// Log In
// ============================================================================

/// POST /accounts/login
pub async fn log_in<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    // Nothing about the shape of a bad login is reported back
    let Json(req) = payload.map_err(|_| AuthError::InvalidCredentials)?;

    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone(), state.codec.clone());
    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(with_tokens(output.tokens, AccountResponse::from(&output.account)))
}

// ============================================================================
// Session-guarded
// ============================================================================

/// GET /accounts/me/access-token
///
/// The session is not rotated; only a new access token is minted.
pub async fn renew_access_token<R>(
    State(state): State<AuthAppState<R>>,
    session: VerifiedSession,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let issuer = TokenIssuer::new(state.repo.clone(), state.config.clone(), state.codec.clone());
    let access_token = issuer.generate_access_token(&session.account)?;

    tracing::info!(account_id = %session.account.account_id, "Access token renewed");

    Ok((
        [(ACCESS_TOKEN_HEADER, access_token.clone())],
        Json(AccessTokenResponse { access_token }),
    ))
}

/// DELETE /accounts/me/session
pub async fn revoke_session<R>(
    State(state): State<AuthAppState<R>>,
    session: VerifiedSession,
) -> AuthResult<StatusCode>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    SignOutUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&session.account.account_id, &session.refresh_token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
