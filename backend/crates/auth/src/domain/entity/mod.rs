//! Entity Module

pub mod account;
pub mod session;

pub use account::{Account, HasSessions, IssuesTokens};
pub use session::{Session, SessionLookup};
