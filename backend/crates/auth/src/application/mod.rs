//! Application Layer
//!
//! Use cases and application services.

pub mod access_token;
pub mod account_resolver;
pub mod check_session;
pub mod config;
pub mod deadline;
pub mod purge_sessions;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod token_issuer;

// Re-exports
pub use access_token::{AccessClaims, AccessTokenCodec};
pub use account_resolver::AccountResolver;
pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use purge_sessions::PurgeExpiredSessionsUseCase;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token_issuer::{TokenIssuer, TokenPair};
