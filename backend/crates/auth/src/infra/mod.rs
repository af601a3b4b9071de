//! Infrastructure Layer
//!
//! Store implementations of the repository traits.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAccountRepository;
pub use postgres::PgAccountRepository;
