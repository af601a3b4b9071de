//! Value Object Module

pub mod account_secret;
pub mod email;

pub use account_secret::{RawSecret, SecretHash};
pub use email::Email;
pub use kernel::id::AccountId;
