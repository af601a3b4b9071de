//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Account and session entities, repository trait
//! - `application/` - Token issuing, account resolution, use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Two-token model
//! - Access tokens: HS256, short-lived, verified without a store lookup
//!   (`access_auth`)
//! - Refresh tokens: opaque, one per session, stored on the account and
//!   checked by `session_auth`; used only to mint new access tokens
//!
//! ## Security Model
//! - Secrets hashed with Argon2id on the blocking pool
//! - Unknown email and wrong secret are indistinguishable to the caller
//! - Session expiry is fail-closed at the boundary
//! - Store timeouts surface as 503, never as an authorization result

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult, SessionMiss};
pub use infra::{InMemoryAccountRepository, PgAccountRepository};
pub use presentation::handlers::AuthAppState;
pub use presentation::router::account_router_generic;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
