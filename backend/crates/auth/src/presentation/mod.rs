//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    ACCESS_TOKEN_HEADER, ACCOUNT_ID_HEADER, AccessAuthState, AuthenticatedAccount,
    REFRESH_TOKEN_HEADER, VerifiedSession, access_auth, session_auth,
};
pub use router::account_router_generic;
