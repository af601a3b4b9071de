//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::InMemoryQuizRepository;
pub use postgres::PgQuizRepository;
