//! Shared Kernel
//!
//! Vocabulary shared by every crate in the workspace:
//! - the unified [`error::app_error::AppError`] and its [`error::kind::ErrorKind`]
//! - typed identifiers ([`id::AccountId`], [`id::PaperId`], [`id::QuestionId`])
//!
//! Nothing domain-specific lives here; only types whose meaning is the same
//! for the auth core and the resource crates.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
